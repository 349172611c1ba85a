use std::fmt;

/// Named collections held by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Bookings,
    Users,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Bookings => "bookings",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
