use uuid::Uuid;

/// Source of fresh opaque identifiers. The pipeline draws one id for
/// the archive, then one per clip in discovery order; uniqueness is
/// trusted, never re-checked or deduplicated.
pub trait IdentitySource {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, uppercased like `uuidgen` tokens.
pub struct UuidSource;

impl IdentitySource for UuidSource {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string().to_uppercase()
    }
}

/// Deterministic stand-in for tests: ID-0001, ID-0002, ...
#[cfg(test)]
pub(crate) struct SequentialIds(pub u32);

#[cfg(test)]
impl IdentitySource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.0 += 1;
        format!("ID-{:04}", self.0)
    }
}
