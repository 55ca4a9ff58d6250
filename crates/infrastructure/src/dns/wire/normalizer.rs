//! Projection of a decoded DNS message into [`NormalizedResponse`].

use ferrous_doh_domain::{NormalizedAnswer, NormalizedQuestion, NormalizedResponse};
use hickory_proto::op::Message;
use hickory_proto::rr::{RData, Record};

pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Pure projection: one `NormalizedAnswer` per wire answer, in order.
    pub fn normalize(message: &Message) -> NormalizedResponse {
        NormalizedResponse {
            status: u16::from(message.response_code()),
            truncated: message.truncated(),
            recursion_desired: message.recursion_desired(),
            recursion_available: message.recursion_available(),
            authenticated_data: message.authentic_data(),
            checking_disabled: message.checking_disabled(),
            question: message
                .queries()
                .iter()
                .map(|q| NormalizedQuestion {
                    name: q.name().to_utf8(),
                    record_type: u16::from(q.query_type()),
                })
                .collect(),
            answer: message
                .answers()
                .iter()
                .map(|record| NormalizedAnswer {
                    name: record.name().to_utf8(),
                    record_type: u16::from(record.record_type()),
                    ttl: record.ttl(),
                    data: Self::render_data(record),
                })
                .collect(),
        }
    }

    /// Lossy for MX (exchange only) and SOA (MNAME only). Types
    /// without a dedicated renderer fall back to the record's presentation
    /// form.
    pub fn render_data(record: &Record) -> String {
        match record.data() {
            RData::A(a) => a.0.to_string(),
            RData::AAAA(aaaa) => aaaa.0.to_string(),
            RData::CNAME(cname) => cname.0.to_utf8(),
            RData::NS(ns) => ns.0.to_utf8(),
            RData::PTR(ptr) => ptr.0.to_utf8(),
            RData::MX(mx) => mx.exchange().to_utf8(),
            RData::SOA(soa) => soa.mname().to_utf8(),
            RData::TXT(txt) => txt
                .txt_data()
                .iter()
                .map(|chunk| String::from_utf8_lossy(chunk))
                .collect::<Vec<_>>()
                .join(" "),
            _ => record.to_string(),
        }
    }
}
