//! Built-in teams so the CLI runs without a roster file.

use rift_core::{Player, Role, Roster, Team};

const ROLES: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Bot, Role::Support];

fn team(id: &str, name: &str, short: &str, lineup: [(&str, u8, i8); 5]) -> Team {
    let players = ROLES
        .iter()
        .zip(lineup)
        .map(|(role, (name, rating, form))| Player::new(name, *role, rating).with_form(form))
        .collect();
    let mut team = Team::new(id, name, players);
    team.short_name = Some(short.to_string());
    team
}

pub fn demo_roster() -> Roster {
    Roster::from_teams([
        team(
            "azure",
            "Azure Dragons",
            "AZD",
            [("Keel", 78, 2), ("Moss", 74, 0), ("Vanta", 82, 3), ("Rook", 76, -1), ("Hale", 71, 0)],
        ),
        team(
            "crimson",
            "Crimson Wolves",
            "CRW",
            [("Brand", 75, 0), ("Quill", 79, 1), ("Sable", 77, -2), ("Ivo", 80, 2), ("Tern", 73, 0)],
        ),
        team(
            "gilded",
            "Gilded Owls",
            "GLO",
            [("Pell", 68, 4), ("Aster", 70, 0), ("Coda", 72, 1), ("Nim", 69, 0), ("Wren", 66, -3)],
        ),
        team(
            "umbra",
            "Umbra Syndicate",
            "UMB",
            [("Drift", 83, -2), ("Fen", 81, 0), ("Lux", 85, 0), ("Oro", 79, 1), ("Sift", 78, 2)],
        ),
    ])
}
