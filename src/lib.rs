//! trainerpack - Spreadsheet-to-JSON trainer pack generator
//!
//! This crate reads trainer rosters from an Excel workbook (XLSX), groups the rows of each
//! sheet by badge level and renders JSON templates containing `{{PLACEHOLDER}}` tokens into
//! a tree of game-content pack files.
//!
//! A placeholder that makes up a whole string is replaced by a typed value (a list, a number,
//! the full team list); a placeholder embedded in a larger string is replaced by text.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::PathBuf;
//! use trainerpack::{PackBuilder, PackSink, TemplatePaths, TemplateSet};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = PackBuilder::new().build()?;
//!
//!     // Load the templates once per run
//!     let templates = TemplateSet::load(&TemplatePaths::default())?;
//!
//!     // Convert the workbook into a directory tree
//!     let input = File::open("trainers.xlsx")?;
//!     let sinks = [PackSink::Directory(PathBuf::from("output_jsons"))];
//!     converter.convert(input, &templates, &sinks)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::PathBuf;
//! use trainerpack::{PackBuilder, PackLayout, PackSink, SheetSelector, TemplatePaths, TemplateSet};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = PackBuilder::new()
//!         .with_sheet_selector(SheetSelector::Names(vec!["Fire".to_string()]))
//!         .with_group_key_column("Tier")
//!         .with_elite_tier(10)
//!         .with_layout(PackLayout {
//!             squad_prefix: "rival_".to_string(),
//!             ..PackLayout::default()
//!         })
//!         .build()?;
//!
//!     let templates = TemplateSet::load(&TemplatePaths::default())?;
//!     let input = File::open("trainers.xlsx")?;
//!     let sinks = [
//!         PackSink::Directory(PathBuf::from("output_jsons")),
//!         PackSink::Zip(PathBuf::from("trainer_pack.zip")),
//!     ];
//!     converter.convert(input, &templates, &sinks)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rendering Without a Workbook
//!
//! ```rust
//! use serde_json::json;
//! use trainerpack::{PackBuilder, RenderedOutput, Sheet, Record, CellValue, TemplateSet};
//!
//! # fn main() -> Result<(), trainerpack::TrainerPackError> {
//! let sheet = Sheet::new("Rock", vec![
//!     Record::from_pairs([("Badge Level", CellValue::Int(1)), ("Leader Name", CellValue::from("Brock"))]),
//! ]);
//! let templates = TemplateSet::new(json!({"name": "{{LEADER_NAME}}", "level": "{{BADGE_LEVEL}}"}));
//!
//! let converter = PackBuilder::new().build()?;
//! let outputs: Vec<RenderedOutput> = converter.convert_sheets(&[sheet], &templates);
//! assert_eq!(outputs[0].tree, json!({"name": "Brock", "level": 1}));
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod entity;
mod error;
mod infer;
mod output;
mod parser;
mod roster;
mod sanitize;
mod security;
mod settings;
mod template;
mod types;

// 公開API
pub use api::{OutputKind, SheetSelector, DEFAULT_SHEETS};
pub use builder::{ConversionSummary, PackBuilder, PackConverter};
pub use entity::{build_entity, entity_attributes, STATS};
pub use error::TrainerPackError;
pub use infer::{infer_cell, infer_str};
pub use output::{
    prepare_entries, DirectoryWriter, PackEntry, PackLayout, PackSink, RenderedOutput,
    ZipPackWriter,
};
pub use parser::WorkbookParser;
pub use roster::{
    forward_fill, group_rosters, NoPrerequisites, PrerequisitePolicy, Roster, RosterColumns,
    RosterEntry, RosterIndex, TierPolicy,
};
pub use sanitize::{file_token, sanitize_cell, sanitize_identifier, Separator};
pub use settings::{PrerequisiteSettings, Settings, SettingsOverrides};
pub use template::{
    interpolate, render, render_str, stringify_value, whole_placeholder, AttributeContext,
    GroupContext, PlaceholderContext, TemplatePaths, TemplateSet, TEAM_LIST_PLACEHOLDER,
};
pub use types::{CellValue, Record, Sheet};
