use crate::particle::Particle;
use glam::{Quat, Vec3};

/// Drawing backend fed by the simulation after each frame
pub trait Renderer {
    fn draw(&mut self, position: Vec3, orientation: Quat, scale: Vec3);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, position: Vec3, orientation: Quat, scale: Vec3) {
        (**self).draw(position, orientation, scale);
    }
}

/// Hand every particle's placement to the renderer, in order
pub fn render_particles<R: Renderer + ?Sized>(particles: &[Particle], renderer: &mut R) {
    for particle in particles {
        renderer.draw(particle.position, particle.orientation, particle.scale);
    }
}
