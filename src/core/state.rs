use bevy::prelude::States;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub(crate) enum ViewerState {
    /// First terrain still being built
    #[default]
    Generating,
    Viewing,
}
