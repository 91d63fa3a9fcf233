use uuid::Uuid;

/// Durable identifiers are 36-character hyphenated hex strings as assigned by
/// the store. `Uuid::parse_str` alone also accepts simple/braced/urn forms,
/// which must stay classified as "not yet persisted".
pub fn parse_durable_id(raw: &str) -> Option<Uuid> {
    let bytes = raw.as_bytes();
    if bytes.len() != 36 {
        return None;
    }
    for (index, byte) in bytes.iter().enumerate() {
        match index {
            8 | 13 | 18 | 23 => {
                if *byte != b'-' {
                    return None;
                }
            }
            _ => {
                if !byte.is_ascii_hexdigit() {
                    return None;
                }
            }
        }
    }
    Uuid::parse_str(raw).ok()
}
