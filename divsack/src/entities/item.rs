/// Candidate item for the chosen group
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    /// Position of the item in its [`Instance`](crate::entities::Instance)
    pub id: usize,
    pub value: u64,
    pub weight: u64,
    pub volume: u64,
    /// Opaque manufacturer label
    pub manufacturer: String,
    /// Opaque product type label
    pub product_type: String,
}

impl Item {
    pub fn new(
        id: usize,
        value: u64,
        weight: u64,
        volume: u64,
        manufacturer: impl Into<String>,
        product_type: impl Into<String>,
    ) -> Item {
        Item {
            id,
            value,
            weight,
            volume,
            manufacturer: manufacturer.into(),
            product_type: product_type.into(),
        }
    }

    pub fn clone_with_id(&self, id: usize) -> Item {
        Item { id, ..self.clone() }
    }
}
