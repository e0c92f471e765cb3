use rand::rngs::StdRng;
use rand::SeedableRng;

use pug::color;
use pug::commands::{self, JoinOutcome, ReplyTo, TeamSize};
use pug::config::{Config, SimulateArgs};
use pug::platform::{InMemoryPlatform, Outgoing, Overwrites, Platform};
use pug::session::{SessionRegistry, Trigger};

const NAMES: &[&str] = &[
    "Aaron", "Betty", "Carlos", "Diana", "Ethan", "Fiona", "George", "Hannah", "Ivan", "Julia",
    "Kevin", "Laura", "Mason", "Nora", "Oscar", "Paula", "Quinn", "Rosa", "Sam", "Tina",
];

fn player_name(index: usize) -> String {
    match NAMES.get(index) {
        Some(name) => name.to_string(),
        None => format!("Player {}", index + 1),
    }
}

/// Run a PUG end to end against an in-memory guild and print what happened.
pub async fn cmd_simulate(config: &Config, args: &SimulateArgs) -> Result<(), String> {
    let platform = InMemoryPlatform::new();
    let scope = platform.add_scope(&args.category, Overwrites::new());
    let lobby_channel = platform.add_text_channel("pug");
    let mut registry = SessionRegistry::new();

    let mut settings = config.settings_for(scope.id);
    // Configured archive ids refer to a real guild; use a local channel instead.
    settings.archive = args
        .archive
        .then(|| platform.add_text_channel("pug-archive"));

    let host = platform.add_member_with("Host", false, 10);
    let opener = platform.member(host).await.map_err(|e| e.to_string())?;
    let trigger = commands::start(
        &mut registry,
        &platform,
        &scope,
        &opener,
        lobby_channel,
        &settings,
        config,
    )
    .await
    .map_err(|e| e.to_string())?;
    println!("{} PUG opened in {}", color::label("==>"), scope.name);
    print_new_messages(&platform, 0);

    let lobby_voice = registry
        .lobby(scope.id)
        .and_then(|lobby| lobby.voice())
        .map(|voice| voice.id);

    // Alternate between the join command and the join reaction.
    for i in 0..args.players {
        let id = platform.add_member(&player_name(i));
        if let Some(voice) = lobby_voice {
            platform.join_voice(id, voice);
        }
        let member = platform.member(id).await.map_err(|e| e.to_string())?;
        if i % 2 == 0 {
            commands::join(
                &registry,
                &platform,
                scope.id,
                &member,
                ReplyTo::Channel(lobby_channel),
            )
            .await
            .map_err(|e| e.to_string())?;
        } else {
            react(&mut registry, &platform, trigger, id).await?;
        }
    }
    let seen = platform.sent().len();

    let team_size = match (args.size, args.count) {
        (None, None) => TeamSize::count(2),
        (size, count) => TeamSize { size, count },
    };
    let split = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            commands::split_with_rng(
                &mut registry,
                &platform,
                scope.id,
                team_size,
                &settings,
                config,
                &mut rng,
            )
            .await
        }
        None => {
            commands::split(&mut registry, &platform, scope.id, team_size, &settings, config).await
        }
    };
    split.map_err(|e| e.to_string())?;
    println!("\n{} Teams", color::label("==>"));
    print_teams(&registry, &platform, scope.id).await?;

    if args.late > 0 {
        println!("\n{} Late joiners", color::label("==>"));
    }
    for i in 0..args.late {
        let id = platform.add_member(&player_name(args.players + i));
        let member = platform.member(id).await.map_err(|e| e.to_string())?;
        let outcome = commands::join(
            &registry,
            &platform,
            scope.id,
            &member,
            ReplyTo::Channel(lobby_channel),
        )
        .await
        .map_err(|e| e.to_string())?;
        match outcome {
            JoinOutcome::Joined => println!("  {} joined", member.display_name),
            JoinOutcome::AlreadyJoined => {
                println!("  {} was already playing", member.display_name)
            }
            JoinOutcome::Full => println!("  {} was turned away", member.display_name),
        }
    }
    print_new_messages(&platform, seen);

    let seen = platform.sent().len();
    commands::stop(&mut registry, &platform, scope.id, &settings, config)
        .await
        .map_err(|e| e.to_string())?;
    println!("\n{} PUG stopped", color::label("==>"));
    print_new_messages(&platform, seen);
    println!(
        "  {}",
        color::dim(&format!(
            "{} role(s) and {} channel(s) left",
            platform.roles().len(),
            platform.channels().len()
        ))
    );
    Ok(())
}

async fn react(
    registry: &mut SessionRegistry,
    platform: &InMemoryPlatform,
    trigger: Trigger,
    id: pug::platform::MemberId,
) -> Result<(), String> {
    let member = platform.member(id).await.map_err(|e| e.to_string())?;
    commands::join_by_trigger(registry, platform, trigger, &member)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

async fn print_teams(
    registry: &SessionRegistry,
    platform: &InMemoryPlatform,
    scope: pug::platform::ScopeId,
) -> Result<(), String> {
    let Some(lobby) = registry.lobby(scope) else {
        return Ok(());
    };
    for team in lobby.teams() {
        let members = team.members(platform).await.map_err(|e| e.to_string())?;
        let names: Vec<String> = members.iter().map(|m| m.display_name.clone()).collect();
        println!(
            "  {} {} {}",
            color::paint(team.name(), team.role().colour),
            color::dim(&format!("({})", team.role().colour)),
            names.join(", ")
        );
    }
    Ok(())
}

fn print_new_messages(platform: &InMemoryPlatform, skip: usize) {
    for sent in platform.sent().into_iter().skip(skip) {
        match sent.message {
            Outgoing::Text(text) => {
                for line in text.lines() {
                    println!("  {}", line);
                }
            }
            Outgoing::Embed(embed) => {
                println!("  [summary] {}", color::label(&embed.title));
                for line in embed.description.lines() {
                    println!("    {}", line);
                }
            }
            Outgoing::File(file) => println!(
                "  [file] {} {}",
                file.filename,
                color::dim(&format!("({} bytes)", file.bytes.len()))
            ),
        }
    }
}
