fn apple_sprite(kind: AppleKind) -> (&'static str, [u8; 4]) {
    match kind {
        AppleKind::Normal => ("apples/apple", APPLE_COLOR),
        AppleKind::Golden => ("apples/golden", GOLDEN_COLOR),
        AppleKind::Mush { from_golden: false } => ("apples/mush", MUSH_COLOR),
        AppleKind::Mush { from_golden: true } => ("apples/golden-mush", MUSH_COLOR),
    }
}

fn push_backdrop(world: &mut SceneWorld) {
    world.push_sprite(SpriteDesc {
        key: "backdrop/sky",
        center: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
        half_extents: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
        fallback_color: SKY_COLOR,
        layer: RenderLayer::Backdrop,
    });
    world.push_sprite(SpriteDesc {
        key: "props/tree",
        center: Vec2::new(WORLD_WIDTH / 2.0, 290.0),
        half_extents: Vec2::new(220.0, 170.0),
        fallback_color: TREE_COLOR,
        layer: RenderLayer::Props,
    });
    let ground_half_height = (WORLD_HEIGHT - GROUND_Y) / 2.0;
    world.push_sprite(SpriteDesc {
        key: "props/ground",
        center: Vec2::new(WORLD_WIDTH / 2.0, GROUND_Y + ground_half_height),
        half_extents: Vec2::new(WORLD_WIDTH / 2.0, ground_half_height),
        fallback_color: GROUND_COLOR,
        layer: RenderLayer::Props,
    });
}

fn push_session_sprites(session: &GameSession, world: &mut SceneWorld) {
    for monkey in session.troop().iter().filter(|monkey| monkey.visible) {
        world.push_sprite(SpriteDesc {
            key: "actors/monkey",
            center: monkey.side.perch(),
            half_extents: Vec2::new(32.0, 32.0),
            fallback_color: MONKEY_COLOR,
            layer: RenderLayer::Actors,
        });
    }

    let player = session.player();
    world.push_sprite(SpriteDesc {
        key: player.look().sprite_key(),
        center: player.body.position,
        half_extents: player.body.half_extents,
        fallback_color: PLAYER_COLOR,
        layer: RenderLayer::Actors,
    });

    for (_, apple) in session.apples().iter_live() {
        let (key, fallback_color) = apple_sprite(apple.kind);
        world.push_sprite(SpriteDesc {
            key,
            center: apple.body.position,
            half_extents: apple.body.half_extents,
            fallback_color,
            layer: RenderLayer::Pickups,
        });
    }

    for banana in session.bananas() {
        world.push_sprite(SpriteDesc {
            key: "projectiles/banana",
            center: banana.body.position,
            half_extents: banana.body.half_extents,
            fallback_color: BANANA_COLOR,
            layer: RenderLayer::Projectiles,
        });
    }
}

fn shop_icon_center(slot: usize) -> Vec2 {
    Vec2::new(SHOP_ICON_FIRST_X + SHOP_ICON_SPACING * slot as f32, SHOP_ICON_Y)
}

/// The upgrade whose shop icon covers `point`, in the same slot order the
/// icons are drawn in.
fn shop_icon_at(point: Vec2) -> Option<UpgradeKind> {
    UpgradeKind::ALL
        .into_iter()
        .enumerate()
        .find(|&(slot, _)| {
            let center = shop_icon_center(slot);
            (point.x - center.x).abs() <= SHOP_ICON_HALF_EXTENT
                && (point.y - center.y).abs() <= SHOP_ICON_HALF_EXTENT
        })
        .map(|(_, kind)| kind)
}

/// Upgrade icons in a row above the shop panel.
fn push_shop_icons(session: &GameSession, world: &mut SceneWorld) {
    for (slot, upgrade) in session.upgrades().iter().enumerate() {
        world.push_sprite(SpriteDesc {
            key: upgrade.icon_key(),
            center: shop_icon_center(slot),
            half_extents: Vec2::new(SHOP_ICON_HALF_EXTENT, SHOP_ICON_HALF_EXTENT),
            fallback_color: SHOP_ICON_COLOR,
            layer: RenderLayer::Pickups,
        });
    }
}
