pub mod checklist_completions;
pub mod checklist_items;
pub mod emergencies;
pub mod module_completions;
pub mod questions;
pub mod star_videos;
pub mod users;
pub mod video_modules;

pub use checklist_completions::Entity as ChecklistCompletions;
pub use checklist_items::Entity as ChecklistItems;
pub use emergencies::Entity as Emergencies;
pub use module_completions::Entity as ModuleCompletions;
pub use questions::Entity as Questions;
pub use star_videos::Entity as StarVideos;
pub use users::Entity as Users;
pub use users::Model as User;
pub use video_modules::Entity as VideoModules;
pub use video_modules::Model as VideoModule;
