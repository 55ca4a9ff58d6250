use crate::errors::DomainError;
use std::fmt;
use std::str::FromStr;

/// DNS resource record type as carried in a question.
///
/// Types without a mnemonic here are kept as `Unknown(code)` and printed in
/// the RFC 3597 `TYPEnnn` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,

    SRV,
    SOA,
    NS,
    NAPTR,
    DS,
    DNSKEY,
    SVCB,
    HTTPS,

    CAA,
    TLSA,
    SSHFP,
    DNAME,

    RRSIG,
    NSEC,
    NSEC3,
    NSEC3PARAM,

    CDS,
    CDNSKEY,

    OPT,

    NULL,
    HINFO,

    OPENPGPKEY,

    ANY,

    Unknown(u16),
}

const MNEMONICS: &[(&str, RecordType)] = &[
    ("A", RecordType::A),
    ("AAAA", RecordType::AAAA),
    ("CNAME", RecordType::CNAME),
    ("MX", RecordType::MX),
    ("TXT", RecordType::TXT),
    ("PTR", RecordType::PTR),
    ("SRV", RecordType::SRV),
    ("SOA", RecordType::SOA),
    ("NS", RecordType::NS),
    ("NAPTR", RecordType::NAPTR),
    ("DS", RecordType::DS),
    ("DNSKEY", RecordType::DNSKEY),
    ("SVCB", RecordType::SVCB),
    ("HTTPS", RecordType::HTTPS),
    ("CAA", RecordType::CAA),
    ("TLSA", RecordType::TLSA),
    ("SSHFP", RecordType::SSHFP),
    ("DNAME", RecordType::DNAME),
    ("RRSIG", RecordType::RRSIG),
    ("NSEC", RecordType::NSEC),
    ("NSEC3", RecordType::NSEC3),
    ("NSEC3PARAM", RecordType::NSEC3PARAM),
    ("CDS", RecordType::CDS),
    ("CDNSKEY", RecordType::CDNSKEY),
    ("OPT", RecordType::OPT),
    ("NULL", RecordType::NULL),
    ("HINFO", RecordType::HINFO),
    ("OPENPGPKEY", RecordType::OPENPGPKEY),
    ("ANY", RecordType::ANY),
];

impl RecordType {
    /// Mnemonic for the type, `None` for `Unknown`.
    pub fn mnemonic(&self) -> Option<&'static str> {
        MNEMONICS
            .iter()
            .find(|(_, rt)| rt == self)
            .map(|(name, _)| *name)
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::NULL => 10,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::OPT => 41,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::NSEC3PARAM => 51,
            RecordType::TLSA => 52,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::OPENPGPKEY => 61,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
            RecordType::Unknown(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordType::A,
            2 => RecordType::NS,
            5 => RecordType::CNAME,
            6 => RecordType::SOA,
            10 => RecordType::NULL,
            12 => RecordType::PTR,
            13 => RecordType::HINFO,
            15 => RecordType::MX,
            16 => RecordType::TXT,
            28 => RecordType::AAAA,
            33 => RecordType::SRV,
            35 => RecordType::NAPTR,
            39 => RecordType::DNAME,
            41 => RecordType::OPT,
            43 => RecordType::DS,
            44 => RecordType::SSHFP,
            46 => RecordType::RRSIG,
            47 => RecordType::NSEC,
            48 => RecordType::DNSKEY,
            50 => RecordType::NSEC3,
            51 => RecordType::NSEC3PARAM,
            52 => RecordType::TLSA,
            59 => RecordType::CDS,
            60 => RecordType::CDNSKEY,
            61 => RecordType::OPENPGPKEY,
            64 => RecordType::SVCB,
            65 => RecordType::HTTPS,
            255 => RecordType::ANY,
            257 => RecordType::CAA,
            other => RecordType::Unknown(other),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, RecordType::ANY)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.to_u16()),
        }
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();

        if let Some((_, rt)) = MNEMONICS.iter().find(|(name, _)| *name == upper) {
            return Ok(*rt);
        }

        if let Some(code) = upper.strip_prefix("TYPE") {
            if let Ok(code) = code.parse::<u16>() {
                return Ok(RecordType::from_u16(code));
            }
        }

        Err(DomainError::EncodeError(format!(
            "Unknown record type: {}",
            s
        )))
    }
}

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        RecordType::from_u16(code)
    }
}

impl From<RecordType> for u16 {
    fn from(rt: RecordType) -> Self {
        rt.to_u16()
    }
}
