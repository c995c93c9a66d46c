use crate::Header;

/// A document takes part in synchronisation only once its header already
/// declares `property_name`. The current value of the field is irrelevant.
pub fn is_eligible(header: Option<&Header>, property_name: &str) -> bool {
    header.is_some_and(|header| header.contains_key(property_name))
}
