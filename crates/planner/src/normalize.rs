/// Canonical matching key for an item name: trimmed and lower-cased.
///
/// Two names equal under this function are the same physical good
/// everywhere in the engine. No stemming or fuzzy matching: "Caderno" and
/// "Cadernos" stay distinct.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
