//! Domain entities and their construction rules.

mod story;
mod user;

pub use story::{NewStory, Story, StoryChanges};
pub use user::{NewUser, User, UserChanges};
