use serde_json::Value;

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of documents impacted by the operation
    Count(u64),

    /// Documents matched by the operation
    Documents(Vec<Value>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn documents(documents: Vec<Value>) -> Self {
        Self {
            rows: Rows::Documents(documents),
        }
    }

    pub fn empty() -> Self {
        Self {
            rows: Rows::Documents(vec![]),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_documents(&self) -> bool {
        matches!(self, Self::Documents(_))
    }

    pub fn into_documents(self) -> Option<Vec<Value>> {
        match self {
            Self::Documents(documents) => Some(documents),
            Self::Count(_) => None,
        }
    }

    pub fn into_count(self) -> Option<u64> {
        match self {
            Self::Count(count) => Some(count),
            Self::Documents(_) => None,
        }
    }
}
