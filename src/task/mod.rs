//! Task commands

mod add;
mod delete;
mod depend;
mod get;
mod list;
mod mv;
mod next;
mod undepend;
mod update;

pub use add::AddTask;
pub use delete::DeleteTask;
pub use depend::AddDependency;
pub use get::GetTask;
pub use list::ListTasks;
pub use mv::MoveTask;
pub use next::NextTask;
pub use undepend::RemoveDependency;
pub use update::UpdateTask;
