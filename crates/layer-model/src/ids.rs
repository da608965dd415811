#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::ModelError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim())
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`crate::LayerSection`].
    SectionId,
    "section"
);
record_id!(
    /// Identifier of a [`crate::LayerGroup`].
    GroupId,
    "group"
);
record_id!(
    /// Identifier of a [`crate::LayerData`] record.
    DataId,
    "layer"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_round_trip() {
        let id = DataId::generate();
        let parsed: DataId = id.to_string().parse().expect("parse id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_garbage() {
        let err = "not-an-id".parse::<GroupId>().unwrap_err();
        assert_eq!(
            err,
            ModelError::InvalidId {
                kind: "group",
                value: "not-an-id".to_string()
            }
        );
    }
}
