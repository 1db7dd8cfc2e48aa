//! Headless battle runner
//!
//! Scripts a small fixed encounter and prints the event trace, as a
//! reporting sink would consume it. Useful for eyeballing balance and for
//! demonstrating the command surface; no engine logic lives here.

use clap::Parser;
use serde::Serialize;

use ashenfield::battle::{
    BattleEngine, BattleState, CharacterDef, EventLog, RangeClass, Skill, Stats, Step,
};
use ashenfield::core::types::{ActionSlot, AttackRange, Team};
use ashenfield::core::BattleConfig;
use ashenfield::rules::indices::{CritStat, StatusId};

/// Headless battle runner - scripted rosters, printed event trace
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a scripted battle and print the event trace")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum full rounds before the run stops
    #[arg(long, default_value_t = 10)]
    max_rounds: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable verbose engine logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    rounds: u32,
    ticks: u64,
    ended: bool,
    winner: Option<Team>,
    events: Vec<String>,
}

fn roster() -> (Vec<CharacterDef>, Vec<CharacterDef>) {
    let allies = vec![
        CharacterDef::new(
            "aldric",
            "Aldric",
            10,
            Stats {
                strength: 14,
                agility: 18,
                constitution: 12,
                intelligence: 8,
                wisdom: 10,
                charisma: 10,
            },
            42,
        ),
        CharacterDef::new(
            "mirena",
            "Mirena",
            9,
            Stats {
                strength: 7,
                agility: 11,
                constitution: 9,
                intelligence: 16,
                wisdom: 14,
                charisma: 12,
            },
            30,
        )
        .with_range(AttackRange::Ranged),
    ];
    let enemies = vec![
        CharacterDef::new(
            "gnarl",
            "Gnarl",
            8,
            Stats {
                strength: 15,
                agility: 9,
                constitution: 14,
                intelligence: 4,
                wisdom: 6,
                charisma: 5,
            },
            48,
        ),
        CharacterDef::new(
            "vex",
            "Vex",
            11,
            Stats {
                strength: 9,
                agility: 16,
                constitution: 8,
                intelligence: 13,
                wisdom: 11,
                charisma: 9,
            },
            28,
        ),
    ];
    (allies, enemies)
}

/// A scripted action for whoever is up, exercising most of the surface
fn scripted_skill(bs: &BattleState, round: u32) -> Skill {
    let actor = bs.current_actor_id().clone();
    let team = bs.current_actor().team;
    // Walk turn order so the pick is as deterministic as the seed
    let foe = bs
        .turn_order
        .iter()
        .filter(|id| {
            bs.combatants
                .get(*id)
                .map_or(false, |c| c.team != team && !c.is_down())
        })
        .cloned()
        .next()
        .unwrap_or_else(|| actor.clone());

    if round == 0 {
        // Open with a gated attack chain: bleed only lands if the hit does
        Skill::new(
            "opening_strike",
            "Opening Strike",
            actor.clone(),
            ActionSlot::Main,
            vec![
                Step::attack(foe.clone()).with_range(RangeClass::Ranged),
                Step::apply_effect(foe, StatusId::Bleeding, 2, 30).gated(1),
            ],
        )
        .with_cooldown(1)
        .with_crit_stat(CritStat::Agi)
    } else {
        Skill::new(
            "press_the_line",
            "Press the Line",
            actor.clone(),
            ActionSlot::Main,
            vec![Step::engage(foe.clone()), Step::attack(foe)],
        )
    }
}

fn print_text(log: &EventLog) {
    for line in log.descriptions() {
        println!("  {line}");
    }
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .init();
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut engine = BattleEngine::with_seed(BattleConfig::default(), seed);

    let (allies, enemies) = roster();
    let mut bs = match engine.create_battle(&allies, &enemies) {
        Ok(bs) => bs,
        Err(e) => {
            eprintln!("Failed to create battle: {e}");
            std::process::exit(1);
        }
    };

    let text = args.format != "json";
    let mut all_events: Vec<String> = Vec::new();
    let mut rounds = 0;

    'rounds: for round in 0..args.max_rounds {
        rounds = round + 1;
        if text {
            println!("--- round {} ---", round + 1);
        }

        for _ in 0..bs.participant_count() {
            let skill = scripted_skill(&bs, round);
            match engine.apply_skill(&mut bs, &skill) {
                Ok(log) => {
                    if text {
                        print_text(&log);
                    }
                    all_events.extend(log.descriptions().iter().map(|s| s.to_string()));
                }
                Err(e) => {
                    if text {
                        println!("  (refused: {e})");
                    }
                    all_events.push(format!("refused: {e}"));
                }
            }

            let log = engine.end_turn(&mut bs);
            if text {
                print_text(&log);
            }
            all_events.extend(log.descriptions().iter().map(|s| s.to_string()));

            if bs.ended {
                break 'rounds;
            }
        }
    }

    if text {
        match &bs.end_reason {
            Some(reason) => println!("\nbattle ended: {reason} after {} ticks", bs.tick),
            None => println!("\nno decision after {} ticks", bs.tick),
        }
    } else {
        let result = RunResult {
            seed,
            rounds,
            ticks: bs.tick,
            ended: bs.ended,
            winner: bs.winner(),
            events: all_events,
        };
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize result: {e}"),
        }
    }
}
