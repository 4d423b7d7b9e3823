//! Combat server entry point.
//!
//! Boots the runtime from content and environment, then runs a headless
//! auto-combat session for a demo character and logs every event it emits.
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_core::{Attributes, Character, CharacterClass, CharacterId, SkillId};
use combat_runtime::{CombatEvent, CombatRuntime, InMemoryCharacterRepo};
use tokio::sync::broadcast::error::RecvError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::ServerConfig;

const DEMO_CHARACTER: CharacterId = CharacterId(1);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _guard = setup_logging(&config)?;

    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    let content = factory
        .load_all()
        .with_context(|| format!("loading content from {}", factory.data_dir().display()))?;

    let runtime = CombatRuntime::builder()
        .config(config.runtime.clone())
        .content(content)
        .characters(Arc::new(InMemoryCharacterRepo::with_characters([
            demo_character(),
        ])))
        .build()
        .await?;

    run_demo(&runtime, config.demo_rounds).await?;
    runtime.shutdown().await?;
    Ok(())
}

/// Starts auto-combat and logs events until the session ends, the round
/// budget is spent, or Ctrl-C.
async fn run_demo(runtime: &CombatRuntime, rounds: u32) -> Result<()> {
    let service = runtime.service();
    let mut events = runtime.subscribe(DEMO_CHARACTER);
    service
        .start_auto(DEMO_CHARACTER, vec![SkillId(2), SkillId(1)])
        .await?;

    let mut seen = 0;
    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };

        match event {
            Ok(CombatEvent::CombatUpdate(update)) => {
                tracing::info!(
                    round = update.round,
                    hp = update.hp,
                    max_hp = update.max_hp,
                    mana = update.mana,
                    dealt = update.damage_dealt,
                    taken = update.damage_taken,
                    kills = update.log.kill_count,
                    "round"
                );
                if update.auto_stopped {
                    tracing::info!(reason = ?update.reason, "auto-combat ended");
                    return Ok(());
                }
                seen += 1;
                if seen >= rounds {
                    break;
                }
            }
            Ok(CombatEvent::EncounterAppeared(encounter)) => {
                let names: Vec<_> = encounter
                    .monsters
                    .iter()
                    .map(|m| format!("{} (lv {})", m.name, m.level))
                    .collect();
                tracing::info!("encounter: {}", names.join(", "));
            }
            Ok(CombatEvent::LevelUp(notice)) => {
                tracing::info!(level = notice.level, gained = notice.levels_gained, "level up");
            }
            Ok(CombatEvent::LootDropped(loot)) => {
                let items: usize = loot.drops.iter().map(|drop| drop.items.len()).sum();
                tracing::info!(copper = loot.copper_gained, items, "loot");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }

    if service.auto_session(DEMO_CHARACTER).await?.is_some() {
        service.stop_auto(DEMO_CHARACTER).await?;
    }
    runtime.disconnect(DEMO_CHARACTER).await?;
    Ok(())
}

fn demo_character() -> Character {
    let mut character = Character::new(DEMO_CHARACTER, "Aria", CharacterClass::Warrior);
    character.level = 3;
    character.attributes = Attributes::new(14, 8, 12, 10);
    character.learned_skills = vec![SkillId(1), SkillId(2)];
    character
}

/// Stderr logging, plus a non-blocking file layer when `COMBAT_LOG_DIR` is
/// set. The returned guard flushes the file writer on drop.
fn setup_logging(config: &ServerConfig) -> Result<Option<WorkerGuard>> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, "combat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/combat.log", dir.display());
    }
    Ok(guard)
}
