pub(crate) mod settle;
pub(crate) mod state;
pub(crate) mod tween;
