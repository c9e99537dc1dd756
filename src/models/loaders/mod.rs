pub mod ignore_loader;
pub mod recipe_loader;

pub use ignore_loader::load_ignore_set;
pub use recipe_loader::RecipeStore;
