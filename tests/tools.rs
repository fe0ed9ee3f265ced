use furrow::{Catalog, CropId, CropSpecies, Engine, GridError, Rejection, Tile, Tool, ToolOutcome};

fn catalog() -> Catalog {
    Catalog::new([
        CropSpecies {
            id: CropId::new("carrot"),
            display_name: "Carrot".to_string(),
            total_stages: 3,
            sale_value: 25,
        },
        CropSpecies {
            id: CropId::new("wheat"),
            display_name: "Wheat".to_string(),
            total_stages: 4,
            sale_value: 40,
        },
    ])
}

fn engine() -> Engine {
    Engine::new(8, 8, 50, catalog())
}

fn carrot() -> CropId {
    CropId::new("carrot")
}

#[test]
fn tilling_turns_bare_ground_into_dry_soil() {
    let mut engine = engine();
    assert_eq!(*engine.active_tool(), Tool::Till, "hoe is the starting tool");

    let outcome = engine.use_tool_at(3, 4).unwrap();
    assert!(outcome.is_applied());
    assert_eq!(*engine.tile(3, 4).unwrap(), Tile::Tilled { watered: false });
}

#[test]
fn tilling_worked_ground_is_rejected() {
    let mut engine = engine();
    engine.use_tool_at(0, 0).unwrap();

    let outcome = engine.use_tool_at(0, 0).unwrap();
    assert_eq!(
        outcome,
        ToolOutcome::Rejected(Rejection::AlreadyTilled),
        "second till on the same tile must be a no-op rejection"
    );
    assert_eq!(*engine.tile(0, 0).unwrap(), Tile::Tilled { watered: false });
}

#[test]
fn watering_works_on_tilled_and_planted_tiles_only() {
    let mut engine = engine();
    engine.use_tool_at(0, 0).unwrap(); // till

    engine.select_tool(Tool::Water).unwrap();
    let outcome = engine.use_tool_at(1, 1).unwrap();
    assert_eq!(outcome, ToolOutcome::Rejected(Rejection::NothingToWater));
    assert_eq!(*engine.tile(1, 1).unwrap(), Tile::Bare);

    assert!(!engine.tile(0, 0).unwrap().is_watered());
    assert!(engine.use_tool_at(0, 0).unwrap().is_applied());
    assert_eq!(*engine.tile(0, 0).unwrap(), Tile::Tilled { watered: true });
    assert!(engine.tile(0, 0).unwrap().is_watered());
}

#[test]
fn planting_consumes_a_seed_and_starts_at_stage_one() {
    let mut engine = engine();
    engine.use_tool_at(0, 0).unwrap(); // till
    engine.buy_seeds(&carrot(), 10).unwrap();
    assert_eq!(engine.seed_count(&carrot()), 1);

    let outcome = engine.use_tool_at(0, 0).unwrap();
    assert!(outcome.is_applied());
    assert_eq!(
        *engine.tile(0, 0).unwrap(),
        Tile::Planted {
            crop: carrot(),
            stage: 1,
            watered: true,
        },
        "a fresh planting is watered for its first day"
    );
    assert_eq!(engine.seed_count(&carrot()), 0);
}

#[test]
fn planting_without_tilled_soil_is_rejected_and_keeps_the_seed() {
    let mut engine = engine();
    engine.buy_seeds(&carrot(), 10).unwrap();

    let outcome = engine.use_tool_at(2, 2).unwrap(); // still bare
    assert_eq!(outcome, ToolOutcome::Rejected(Rejection::PlotNotTilled));
    assert_eq!(*engine.tile(2, 2).unwrap(), Tile::Bare);
    assert_eq!(engine.seed_count(&carrot()), 1, "rejected plant keeps the seed");
}

#[test]
fn planting_with_an_empty_pouch_is_rejected_before_the_grid() {
    let mut engine = engine();
    engine.use_tool_at(0, 0).unwrap(); // till
    engine.select_tool(Tool::Plant(carrot())).unwrap();

    let outcome = engine.use_tool_at(0, 0).unwrap();
    assert_eq!(outcome, ToolOutcome::Rejected(Rejection::InsufficientSeeds));
    assert_eq!(
        *engine.tile(0, 0).unwrap(),
        Tile::Tilled { watered: false },
        "the grid must not be touched when there is no seed to sow"
    );
}

#[test]
fn harvesting_bare_or_unripe_tiles_is_rejected() {
    let mut engine = engine();
    engine.select_tool(Tool::Harvest).unwrap();
    assert_eq!(
        engine.use_tool_at(0, 0).unwrap(),
        ToolOutcome::Rejected(Rejection::NothingToHarvest)
    );

    engine.select_tool(Tool::Till).unwrap();
    engine.use_tool_at(0, 0).unwrap();
    engine.buy_seeds(&carrot(), 10).unwrap();
    engine.use_tool_at(0, 0).unwrap(); // plant, stage 1 of 3

    engine.select_tool(Tool::Harvest).unwrap();
    assert_eq!(
        engine.use_tool_at(0, 0).unwrap(),
        ToolOutcome::Rejected(Rejection::NotRipe)
    );
    assert!(matches!(
        engine.tile(0, 0).unwrap(),
        Tile::Planted { stage: 1, .. }
    ));
}

#[test]
fn coordinates_off_the_farm_are_structural_errors() {
    let mut engine = engine();
    let err = engine.use_tool_at(8, 0).unwrap_err();
    assert!(matches!(err, GridError::OutOfBounds { x: 8, y: 0, .. }));
    let err = engine.use_tool_at(0, 12).unwrap_err();
    assert!(matches!(err, GridError::OutOfBounds { y: 12, .. }));
}

#[test]
fn selecting_an_unregistered_seed_tool_fails() {
    let mut engine = engine();
    let err = engine.select_tool(Tool::Plant(CropId::new("pumpkin")));
    assert!(err.is_err());
    assert_eq!(
        *engine.active_tool(),
        Tool::Till,
        "a failed selection leaves the previous tool in hand"
    );
}

#[test]
fn rejections_leave_every_piece_of_state_untouched() {
    let mut engine = engine();
    engine.use_tool_at(0, 0).unwrap(); // till
    engine.buy_seeds(&carrot(), 10).unwrap();
    engine.use_tool_at(0, 0).unwrap(); // plant

    let day = engine.day();
    let money = engine.money();
    let seeds = engine.seed_count(&carrot());
    let tile = engine.tile(0, 0).unwrap().clone();

    // Unripe harvest, double till, and a bare-water each get rejected.
    engine.select_tool(Tool::Harvest).unwrap();
    assert!(!engine.use_tool_at(0, 0).unwrap().is_applied());
    engine.select_tool(Tool::Till).unwrap();
    assert!(!engine.use_tool_at(0, 0).unwrap().is_applied());
    engine.select_tool(Tool::Water).unwrap();
    assert!(!engine.use_tool_at(5, 5).unwrap().is_applied());

    assert_eq!(engine.day(), day);
    assert_eq!(engine.money(), money);
    assert_eq!(engine.seed_count(&carrot()), seeds);
    assert_eq!(*engine.tile(0, 0).unwrap(), tile);
    assert_eq!(*engine.tile(5, 5).unwrap(), Tile::Bare);
}
