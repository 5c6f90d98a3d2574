pub mod acc;
pub mod game;
pub mod otp;
pub mod post;
pub mod review;
pub mod settings;
pub mod user;

pub use acc::Acc;
pub use game::GameDto;
pub use post::PostDto;
pub use review::ReviewDto;
pub use user::ShopDto;
