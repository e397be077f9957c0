use glam::Vec2;
use shellcast::*;

fn main() -> Result<(), MoveError> {
    env_logger::init();

    let mut world = ShapeWorld::new(WorldConfig { cell_size: 2.0 });
    const PLAYER: u32 = 1;
    const WALLS: u32 = 2;
    const PICKUPS: u32 = 3;
    world.matrix_mut().set_layer_collision(PLAYER, PICKUPS, false);

    // Corridor: floor, ceiling, and an end wall
    for (center, half) in [
        (Vec2::new(5.0, -1.5), Vec2::new(6.0, 0.5)),
        (Vec2::new(5.0, 1.5), Vec2::new(6.0, 0.5)),
        (Vec2::new(10.5, 0.0), Vec2::new(0.5, 1.0)),
    ] {
        let n = world.add_node(None, center, WALLS);
        world.add_shape(n, ShapeKind::Aabb { half_extents: half }, Vec2::ZERO, WALLS, false);
    }
    let coin = world.add_node(None, Vec2::new(4.0, 0.0), PICKUPS);
    world.add_shape(coin, ShapeKind::Circle { radius: 0.3 }, Vec2::ZERO, PICKUPS, false);

    // Player: a box body with a circular "head" child and a trigger aura
    let player = world.add_node(None, Vec2::ZERO, PLAYER);
    world.add_shape(player, ShapeKind::Aabb { half_extents: Vec2::new(0.4, 0.3) }, Vec2::ZERO, PLAYER, false);
    let head = world.add_node(Some(player), Vec2::new(0.0, 0.4), PLAYER);
    world.add_shape(head, ShapeKind::Circle { radius: 0.2 }, Vec2::ZERO, PLAYER, false);
    world.add_shape(player, ShapeKind::Circle { radius: 1.5 }, Vec2::ZERO, PLAYER, true);

    let mut mover = CharacterMover::new(&world, player, Vec2::ZERO, MoverConfig::default())?;
    println!("attached shapes: {}", mover.registry().len());

    let dt = 1.0 / 60.0;
    for tick in 0..240 {
        // Push diagonally into the ceiling and toward the end wall
        mover.set_target_velocity(Vec2::new(4.0, 1.5));
        let report = mover.fixed_update(&world, dt)?;
        world.set_node_position(player, mover.body.position);
        if tick % 30 == 0 || report.recovered {
            println!(
                "tick {tick:3}: pos=({:.3},{:.3}) vel=({:.2},{:.2}) contacts={} recovered={}",
                mover.body.position.x,
                mover.body.position.y,
                mover.body.velocity.x,
                mover.body.velocity.y,
                report.contacts,
                report.recovered
            );
        }
    }
    Ok(())
}
