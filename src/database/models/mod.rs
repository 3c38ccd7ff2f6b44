pub mod blog;
pub mod category;
pub mod comment;
pub mod like;
pub mod user;

pub use blog::{Blog, BlogView, BLOGS};
pub use category::{Category, CategoryView, CATEGORIES};
pub use comment::{Comment, CommentView, COMMENTS};
pub use like::{Like, LikeView, LIKES};
pub use user::{Role, User, UserSummary, CreatorRequest, USERS};
