use bevy_ecs::system::Res;

use super::resources::Halted;

// Bevy run condition functions (for use with `.run_if()`).

pub fn running(halted: Res<Halted>) -> bool {
    !halted.is_halted()
}
