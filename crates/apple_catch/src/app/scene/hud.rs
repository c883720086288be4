fn hud_lines(session: &GameSession) -> Vec<TextLine> {
    let round = session.round();
    let time_tone = if round.time_remaining <= 5 {
        TextTone::Warning
    } else {
        TextTone::Primary
    };
    let mut lines = vec![
        TextLine::primary(format!("SCORE: {}/{}", session.score(), round.apples_needed)),
        TextLine::primary(format!("LEVEL {}", round.level)),
        TextLine::new(format!("TIME LEFT: {}", round.time_remaining), time_tone),
    ];
    let charges = session.player().deflect_charges();
    if charges > 0 {
        lines.push(TextLine::new(format!("SHIELD: {charges}"), TextTone::Accent));
    }
    if session.player().is_stunned() {
        lines.push(TextLine::new("OUCH!", TextTone::Warning));
    }
    lines
}

fn banner_lines(session: &GameSession) -> Vec<TextLine> {
    match session.phase() {
        RoundPhase::Playing if session.round().paused => vec![
            TextLine::new("PAUSED", TextTone::Accent),
            TextLine::primary("ENTER OR ESC: RESUME"),
            TextLine::dim("M: MAIN MENU"),
        ],
        RoundPhase::Playing => Vec::new(),
        RoundPhase::LevelComplete => shop_banner(session),
        RoundPhase::GameOver => {
            let mut lines = vec![TextLine::new("YOU LOSE", TextTone::Warning)];
            lines.extend(stats_lines(session));
            lines.push(TextLine::dim("ENTER OR R: RESTART   M: MAIN MENU"));
            lines
        }
        RoundPhase::GameWin(reason) => {
            let reason_line = match reason {
                WinReason::Level => "YOU PLAYED FOR A WHILE!",
                WinReason::Upgrades => "ALL UPGRADES PURCHASED.",
            };
            let mut lines = vec![
                TextLine::new("YOU WIN!", TextTone::Accent),
                TextLine::primary(reason_line),
            ];
            lines.extend(stats_lines(session));
            lines.push(TextLine::dim("ENTER: KEEP PLAYING   R: RESTART   M: MENU"));
            lines
        }
    }
}

fn shop_banner(session: &GameSession) -> Vec<TextLine> {
    let round = session.round();
    let excess = session.excess_apples();
    let headline = if session.score().saturating_sub(round.apples_needed) >= AMAZING_EXCESS {
        "AMAZING!"
    } else {
        "NICE!"
    };
    let mut lines = vec![
        TextLine::new(headline, TextTone::Accent),
        TextLine::primary("APPLES..."),
        TextLine::primary(format!(">NEEDED: {}", round.apples_needed)),
        TextLine::primary(format!(">CAUGHT: {}", session.score())),
        TextLine::primary(format!(">EXCESS: {excess}")),
    ];
    for (slot, upgrade) in session.upgrades().iter().enumerate() {
        let label = upgrade.kind().as_token().to_uppercase();
        let owned = match upgrade.max_degree() {
            Some(max) => format!("{}/{max}", upgrade.degree()),
            None => upgrade.degree().to_string(),
        };
        let line = match upgrade.affordability(excess) {
            Affordability::Affordable => TextLine::primary(format!(
                "{} {label}: {} ({owned})",
                slot + 1,
                upgrade.price()
            )),
            Affordability::TooExpensive => TextLine::dim(format!(
                "{} {label}: {} ({owned})",
                slot + 1,
                upgrade.price()
            )),
            Affordability::Maxed => TextLine::dim(format!("{} {label}: MAX", slot + 1)),
        };
        lines.push(line);
    }
    let next = session.next_level_tunables();
    lines.push(TextLine::dim(format!(
        "NEXT: LEVEL {} NEEDS {} APPLES",
        next.level, next.apples_needed
    )));
    lines.push(TextLine::dim("ENTER: NEXT LEVEL"));
    lines
}

fn stats_lines(session: &GameSession) -> Vec<TextLine> {
    let stats = session.stats();
    vec![
        TextLine::primary(format!("LEVEL REACHED: {}", session.round().level)),
        TextLine::primary(format!("TOTAL APPLES CAUGHT: {}", stats.total_apples)),
        TextLine::primary(format!("GOLDEN APPLES CAUGHT: {}", stats.golden_apples)),
        TextLine::primary(format!("UPGRADES PURCHASED: {}", stats.upgrades_purchased)),
        TextLine::primary(format!("BANANAS THAT HIT: {}", stats.banana_hits)),
    ]
}

fn title_banner() -> Vec<TextLine> {
    vec![
        TextLine::new("APPLE CATCH", TextTone::Accent),
        TextLine::primary("CATCH APPLES BEFORE TIME RUNS OUT"),
        TextLine::dim("A/D OR ARROWS: MOVE   W OR SPACE: JUMP"),
        TextLine::dim("ESC: PAUSE   1/2/3: BUY IN THE SHOP"),
        TextLine::primary("PRESS ENTER TO START"),
    ]
}
