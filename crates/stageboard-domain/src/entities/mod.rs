//! Status vocabularies and stage maps of the five boards.

/// Implements [`stageboard_core::StageKey`] for a fieldless enum whose serde
/// representation is SCREAMING_SNAKE_CASE.
macro_rules! stage_key {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl stageboard_core::StageKey for $ty {
            fn all() -> &'static [Self] {
                &[$($ty::$variant),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stageboard_core::StageKey::as_str(self))
            }
        }
    };
}

pub(crate) use stage_key;

pub mod deal;
pub mod initiative;
pub mod potential_project;
pub mod project;
pub mod task;

pub use deal::{DealStage, Deals};
pub use initiative::{InitiativeColumn, InitiativeStatus, Initiatives};
pub use potential_project::{PotentialProjects, PotentialStage};
pub use project::{ProjectStatus, Projects};
pub use task::{TaskStatus, Tasks};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage_map::{validate, StageMap};
    use stageboard_core::StageKey;

    fn assert_well_formed<M: StageMap>() {
        validate::<M>().unwrap();
        for status in M::Status::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn every_entity_map_is_total_and_consistent() {
        assert_well_formed::<Deals>();
        assert_well_formed::<PotentialProjects>();
        assert_well_formed::<Initiatives>();
        assert_well_formed::<Tasks>();
        assert_well_formed::<Projects>();
    }
}
