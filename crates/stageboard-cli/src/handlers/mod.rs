/// Call a handler generic over the stage map with the one `kind` selects.
macro_rules! for_entity {
    ($kind:expr, $handler:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            $crate::cli::EntityKind::Deals => {
                $handler::<stageboard_domain::Deals>($($arg),*).await
            }
            $crate::cli::EntityKind::PotentialProjects => {
                $handler::<stageboard_domain::PotentialProjects>($($arg),*).await
            }
            $crate::cli::EntityKind::Initiatives => {
                $handler::<stageboard_domain::Initiatives>($($arg),*).await
            }
            $crate::cli::EntityKind::Tasks => {
                $handler::<stageboard_domain::Tasks>($($arg),*).await
            }
            $crate::cli::EntityKind::Projects => {
                $handler::<stageboard_domain::Projects>($($arg),*).await
            }
        }
    };
}

pub(crate) use for_entity;

pub mod moves;
pub mod replay;
pub mod show;
