//! Load and inspect arena content files
//!
//! Reads `arena.toml` and `catalog.ron` through the content loaders and
//! displays the resolved rules, skills and monster types.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use arena_content::CatalogContent;
use arena_core::{ArenaConfig, MonsterStats};

use super::content_factory;

/// Load content files and print the catalog and rules
#[derive(Parser)]
pub struct InspectContent {
    /// Content directory holding arena.toml and catalog.ron
    /// (defaults to the bundled content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Tables of rules, skills and monster types
    Summary,
    /// Full JSON output
    Json,
}

impl InspectContent {
    pub fn execute(self) -> Result<()> {
        let factory = content_factory(self.data_dir);
        let config = factory
            .load_config()
            .with_context(|| format!("Failed to load rules from {}", factory.data_dir().display()))?;
        let catalog = factory
            .load_catalog()
            .with_context(|| format!("Failed to load catalog from {}", factory.data_dir().display()))?;

        match self.format {
            OutputFormat::Summary => print_summary(&config, &catalog),
            OutputFormat::Json => print_json(&config, &catalog)?,
        }
        Ok(())
    }
}

fn print_summary(config: &ArenaConfig, catalog: &CatalogContent) {
    println!("{}", style("=== Arena Rules ===").bold().green());
    println!("  Max level:          {}", config.max_level);
    println!("  Experience reward:  {}", config.experience_reward);
    println!(
        "  Level threshold:    level x {}",
        config.level_threshold_factor
    );
    println!();

    println!("{}", style("Skills:").bold().yellow());
    for (id, skill) in &catalog.skills {
        println!(
            "  {:<10} {:<14} {:>4}%  {:<9} cooldown {}",
            id.to_string(),
            skill.name,
            skill.damage_multiplier_percent,
            skill.skill_type,
            skill.cooldown_turns
        );
    }
    println!();

    println!("{}", style("Monster Types:").bold().yellow());
    for (id, monster_type) in &catalog.monster_types {
        let top = MonsterStats::at_level(monster_type, config.max_level);
        let skills: Vec<String> = monster_type
            .skill_set
            .iter()
            .map(|skill| skill.to_string())
            .collect();
        println!(
            "  {:<8} {:<8} atk {:>3} -> {:<4} hp {:>4} -> {:<5} [{}]",
            id.to_string(),
            monster_type.name,
            monster_type.base_attack,
            top.attack,
            monster_type.base_health,
            top.max_health,
            skills.join(", ")
        );
    }
}

fn print_json(config: &ArenaConfig, catalog: &CatalogContent) -> Result<()> {
    let value = serde_json::json!({
        "rules": config,
        "skills": catalog.skills,
        "monster_types": catalog.monster_types,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
