// field merging + the type-widening ladder
use crate::core::types::Field;

/// Position of a type token on the widening ladder
/// `byte < short < int < long < char < string < anything else`.
///
/// Tokens are compared case-insensitively; every token off the ladder (entity
/// names, `Object`, collections...) ranks as [`TypeRank::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeRank {
    Byte,
    Short,
    Int,
    Long,
    Char,
    String,
    Other,
}

impl TypeRank {
    pub fn of(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "byte" => TypeRank::Byte,
            "short" => TypeRank::Short,
            "int" => TypeRank::Int,
            "long" => TypeRank::Long,
            "char" => TypeRank::Char,
            "string" => TypeRank::String,
            _ => TypeRank::Other,
        }
    }
}

//wider of the two tokens, ties keep `one`
fn wider_type<'a>(one: &'a str, two: &'a str) -> &'a str {
    if TypeRank::of(one) < TypeRank::of(two) { two } else { one }
}

// name from `one`, widened type, flags OR-ed, annotations unioned
pub fn merge_fields(one: &Field, two: &Field) -> Field {
    Field {
        name: one.name.clone(),
        ty: wider_type(&one.ty, &two.ty).to_string(),
        is_collection: one.is_collection || two.is_collection,
        is_reference: one.is_reference || two.is_reference,
        annotations: one.annotations.union(&two.annotations).cloned().collect(),
    }
}
