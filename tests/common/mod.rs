//! Shared fixtures for the integration tests
//!
//! Workbooks are generated with rust_xlsxwriter and templates are written into temporary
//! directories, so the tests never depend on files checked into the repository.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use rust_xlsxwriter::*;
use serde_json::{json, Value};
use trainerpack::TemplatePaths;

/// A single cell in a fixture row
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Blank,
}

pub use Cell::{Blank, Bool, Number, Text};

pub const TRAINER_HEADERS: [&str; 17] = [
    "Badge Level",
    "Leader Name",
    "Pokemon",
    "Gender",
    "Aspect",
    "Level",
    "Slot 0",
    "Slot 1",
    "Slot 2",
    "Slot 3",
    "Slot 4",
    "Ability",
    "Item",
    "IVs",
    "EVs",
    "Nature",
    "Format",
];

pub fn write_row(worksheet: &mut Worksheet, row: u32, cells: &[Cell<'_>]) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Text(s) => {
                worksheet.write_string(row, col, *s)?;
            }
            Number(n) => {
                worksheet.write_number(row, col, *n)?;
            }
            Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Blank => {}
        }
    }
    Ok(())
}

pub fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

/// A workbook with two type sheets and one sheet without a "Badge Level" column
///
/// - Rock: Brock (badge 1, two members via forward-fill), Roxanne (badge 2)
/// - Water: Misty (badge 1), Brock (badge 2)
/// - Notes: free-form notes
pub fn generate_trainer_workbook() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let rock = workbook.add_worksheet();
    rock.set_name("Rock")?;
    write_headers(rock, &TRAINER_HEADERS)?;
    write_row(
        rock,
        1,
        &[
            Number(1.0),
            Text("Brock"),
            Text("Geodude"),
            Text("male"),
            Blank,
            Number(12.0),
            Text("Tackle"),
            Text("Rock Throw"),
            Blank,
            Blank,
            Blank,
            Text("Sturdy"),
            Blank,
            Number(31.0),
            Number(0.0),
            Text("Adamant"),
            Text("singles"),
        ],
    )?;
    write_row(
        rock,
        2,
        &[
            Blank,
            Blank,
            Text("Onix"),
            Blank,
            Text("shiny"),
            Text("014"),
            Text("Bind"),
            Text(""),
            Text("Rock Tomb"),
            Bool(false),
            Text("Iron-Tail"),
            Text("Rock Head"),
            Text("Hard Stone"),
            Text("31"),
            Number(252.0),
            Blank,
            Blank,
        ],
    )?;
    write_row(
        rock,
        3,
        &[
            Number(2.0),
            Text("Roxanne"),
            Text("Nosepass"),
            Text("female"),
            Blank,
            Number(15.0),
            Text("Rock Tomb"),
            Blank,
            Blank,
            Blank,
            Blank,
            Text("Magnet Pull"),
            Text("Sitrus Berry"),
            Number(20.0),
            Number(0.0),
            Text("Bold"),
            Text("doubles"),
        ],
    )?;

    let water = workbook.add_worksheet();
    water.set_name("Water")?;
    write_headers(water, &TRAINER_HEADERS)?;
    write_row(
        water,
        1,
        &[
            Number(1.0),
            Text("Misty"),
            Text("Staryu"),
            Text("female"),
            Blank,
            Number(18.0),
            Text("Water Gun"),
            Blank,
            Blank,
            Blank,
            Blank,
            Text("Illuminate"),
            Text("Leftovers"),
            Number(31.0),
            Number(0.0),
            Blank,
            Text("singles"),
        ],
    )?;
    write_row(
        water,
        2,
        &[
            Number(2.0),
            Text("Brock"),
            Text("Kabuto"),
            Blank,
            Blank,
            Number(20.0),
            Text("Aqua Jet"),
            Blank,
            Blank,
            Blank,
            Blank,
            Text("Swift Swim"),
            Text("Choice Band"),
            Number(31.0),
            Number(0.0),
            Blank,
            Text("singles"),
        ],
    )?;

    let notes = workbook.add_worksheet();
    notes.set_name("Notes")?;
    write_headers(notes, &["Memo"])?;
    write_row(notes, 1, &[Text("balance pass pending")])?;

    workbook.save_to_buffer()
}

pub fn roster_template() -> Value {
    json!({
        "name": "{{LEADER_NAME}}",
        "id": "gym:{{LEADER_ID}}",
        "badge": "{{BADGE_LEVEL}}",
        "battleFormat": "{{BATTLE_FORMAT}}",
        "requires": "{{REQUIRED_PREREQUISITES}}",
        "team": "{{POKEMON_TEAM_LIST}}"
    })
}

pub fn entity_template() -> Value {
    json!({
        "species": "{{POKEMON_NAME}}",
        "level": "{{POKEMON_LEVEL}}",
        "gender": "{{POKEMON_GENDER}}",
        "nature": "cobblemon:{{POKEMON_NATURE}}",
        "ability": "{{POKEMON_ABILITY}}",
        "heldItem": "{{POKEMON_HELD_ITEM}}",
        "moveset": "{{POKEMON_MOVESET_LIST}}",
        "aspects": "{{POKEMON_ASPECT_LIST}}",
        "ivs": {"hp": "{{POKEMON_IV_HP}}", "spe": "{{POKEMON_IV_SPE}}"},
        "evs": {"atk": "{{POKEMON_EV_ATK}}"}
    })
}

pub fn squad_template() -> Value {
    json!({
        "trainer": "{{LEADER_ID}}",
        "label": "{{LEADER_NAME}} ({{SHEET_NAME}})",
        "size": "{{TEAM_SIZE}}"
    })
}

pub fn progression_template() -> Value {
    json!({
        "criteria": {"defeat": {"trigger": "trainer_defeated", "trainer": "{{ROSTER_FILE}}"}},
        "parents": "{{REQUIRED_PREREQUISITES}}"
    })
}

pub fn trainer_type_template() -> Value {
    json!({"id": "gymleader_chickencoop", "placeholder": "{{LEADER_NAME}}"})
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Write the full template set into `dir` and return the paths
pub fn write_templates(dir: &Path) -> TemplatePaths {
    let paths = paths_in(dir);
    write_json(&paths.roster, &roster_template());
    write_json(&paths.entity, &entity_template());
    write_json(&paths.squad, &squad_template());
    write_json(&paths.progression, &progression_template());
    write_json(&paths.trainer_type, &trainer_type_template());
    paths
}

/// Template paths inside `dir` without creating any files
pub fn paths_in(dir: &Path) -> TemplatePaths {
    TemplatePaths {
        roster: dir.join("gym_leader_template.json"),
        entity: dir.join("pokemon_template.json"),
        squad: dir.join("mob_trainer_group_template.json"),
        progression: dir.join("advancement_template.json"),
        trainer_type: dir.join("trainer_type_template.json"),
    }
}

pub fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    assert!(text.ends_with('\n'), "{} has no trailing newline", path.display());
    serde_json::from_str(&text).unwrap()
}
