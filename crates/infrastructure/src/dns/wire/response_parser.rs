use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decode wire bytes into a Message.
    pub fn parse(bytes: &[u8]) -> Result<Message, DomainError> {
        let message = Message::from_vec(bytes).map_err(|e| {
            DomainError::DecodeError(format!("Failed to parse DNS message: {}", e))
        })?;

        debug!(
            id = message.id(),
            rcode = Self::rcode_to_status(message.response_code()),
            questions = message.queries().len(),
            answers = message.answers().len(),
            truncated = message.truncated(),
            "DNS message parsed"
        );

        Ok(message)
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_decode_error() {
        let result = ResponseParser::parse(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(DomainError::DecodeError(_))));
    }

    #[test]
    fn test_empty_input_is_decode_error() {
        assert!(ResponseParser::parse(&[]).is_err());
    }

    #[test]
    fn test_rcode_names() {
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::NoError), "NOERROR");
        assert_eq!(ResponseParser::rcode_to_status(ResponseCode::NXDomain), "NXDOMAIN");
    }
}
