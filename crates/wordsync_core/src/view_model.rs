use crate::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_document: Option<DocumentId>,
    pub property_name: String,
}
