use crate::host::Document;

/// An id starting with `prefix` that no attached element of `document` carries.
pub fn generate_unique_id<D: Document>(document: &D, prefix: &str) -> String {
    common::generate_unique_id(prefix, |candidate| document.has_element_id(candidate))
}
