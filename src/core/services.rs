pub mod announcement;
pub mod question;
pub mod quiz;

use crate::error::Error;
use uuid::Uuid;

/// A path id that does not parse cannot name a record, so it is reported the
/// same way as an id that names nothing.
pub(crate) fn parse_path_id(id: &str, not_found: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(id).map_err(|_| Error::not_found(not_found))
}

/// Parses every id, or fails listing all of the malformed ones.
pub(crate) fn parse_ids<'a, I>(ids: I, message: &str) -> Result<Vec<Uuid>, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = Vec::new();
    let mut invalid = Vec::new();
    for id in ids {
        match Uuid::parse_str(id) {
            Ok(uuid) => parsed.push(uuid),
            Err(_) => invalid.push(id.to_owned()),
        }
    }
    if !invalid.is_empty() {
        return Err(Error::invalid_ids(message, invalid));
    }
    Ok(parsed)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_ids_reports_every_malformed_id() {
        let good = Uuid::new_v4().to_string();
        let err = parse_ids([good.as_str(), "x", "42"], "bad ids").unwrap_err();
        match err {
            Error::ValidationError { message, invalid_ids, .. } => {
                assert_eq!(message, "bad ids");
                assert_eq!(invalid_ids, Some(vec!["x".to_string(), "42".to_string()]));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ids_keeps_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = parse_ids([b.to_string().as_str(), a.to_string().as_str()], "bad ids").unwrap();
        assert_eq!(parsed, vec![b, a]);
    }
}
