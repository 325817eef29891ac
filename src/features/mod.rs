pub mod health;
pub mod image;
pub mod leaderboard;
