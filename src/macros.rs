#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        weight: $weight:expr,
        semantics: |$words:ident : &[$tok_ty:ty]| $body:block
        $(,)?
    ) => {
        $crate::Rule::new($name, $weight, move |$words: &[$tok_ty]| $body)
    };
}
