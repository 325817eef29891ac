mod builder;
pub mod models;
pub mod rank;

pub use builder::{
    FontOverrides, FontSlot, FontStyles, LeaderboardBuilder, LeaderboardOptions, PodiumColors,
    RenderConfig, XpBarColors,
};
pub use models::{AuroraSpot, BackgroundSpec, GradientKind, Participant, RankTier};
