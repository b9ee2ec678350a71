//! Build fully-initialized simulation scenarios
//!
//! Two sources of bodies:
//! - built-in presets (`Preset` / `SolarSystem`), pure functions returning
//!   fresh `Body` lists with circular-orbit initial velocities
//! - custom bodies from a [`ScenarioConfig`]
//!
//! [`build_scenario`] maps a YAML-facing `ScenarioConfig` onto a configured
//! [`Engine`] ready to step

use std::f64::consts::PI;
use std::str::FromStr;

use log::{debug, info};

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::Body;
use crate::simulation::vector::NVec3;

pub const AU: f64 = 1.496e11;           // astronomical unit, m
pub const SOLAR_MASS: f64 = 1.989e30;   // kg
pub const EARTH_MASS: f64 = 5.972e24;   // kg
pub const MOON_MASS: f64 = 7.342e22;    // kg
pub const DAY: f64 = 86_400.0;          // s
pub const YEAR: f64 = 365.25 * DAY;     // s

/// Earth's mean orbital speed, m/s
pub const EARTH_ORBITAL_SPEED: f64 = 29_780.0;

struct PlanetData {
    name: &'static str,
    mass_ratio: f64,   // relative to Earth
    distance_au: f64,  // orbital radius
    period_years: f64, // sidereal period
    color: &'static str,
    radius_km: f64,
}

const PLANETS: [PlanetData; 8] = [
    PlanetData { name: "Mercury", mass_ratio: 0.0553, distance_au: 0.387, period_years: 0.241, color: "gray", radius_km: 2439.7 },
    PlanetData { name: "Venus", mass_ratio: 0.815, distance_au: 0.723, period_years: 0.615, color: "orange", radius_km: 6051.8 },
    PlanetData { name: "Earth", mass_ratio: 1.0, distance_au: 1.0, period_years: 1.0, color: "blue", radius_km: 6371.0 },
    PlanetData { name: "Mars", mass_ratio: 0.107, distance_au: 1.524, period_years: 1.881, color: "red", radius_km: 3389.5 },
    PlanetData { name: "Jupiter", mass_ratio: 317.8, distance_au: 5.204, period_years: 11.862, color: "brown", radius_km: 69911.0 },
    PlanetData { name: "Saturn", mass_ratio: 95.2, distance_au: 9.573, period_years: 29.457, color: "gold", radius_km: 58232.0 },
    PlanetData { name: "Uranus", mass_ratio: 14.5, distance_au: 19.165, period_years: 84.017, color: "cyan", radius_km: 25362.0 },
    PlanetData { name: "Neptune", mass_ratio: 17.1, distance_au: 30.178, period_years: 164.791, color: "darkblue", radius_km: 24622.0 },
];

/// Circular orbital speed sqrt(G M / r)
#[allow(non_snake_case)]
pub fn orbital_velocity(central_mass: f64, distance: f64, G: f64) -> f64 {
    (G * central_mass / distance).sqrt()
}

/// Kepler's third law: 2 pi sqrt(r^3 / G M)
#[allow(non_snake_case)]
pub fn orbital_period(central_mass: f64, distance: f64, G: f64) -> f64 {
    2.0 * PI * (distance.powi(3) / (G * central_mass)).sqrt()
}

/// Built-in body sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Inner,     // Sun + Mercury..Mars
    Full,      // Sun + all eight planets
    EarthMoon, // Earth + Moon
    SunEarth,  // two-body reference orbit
}

impl FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(Preset::Inner),
            "full" => Ok(Preset::Full),
            "earth_moon" => Ok(Preset::EarthMoon),
            "sun_earth" => Ok(Preset::SunEarth),
            other => Err(SimError::Configuration(format!(
                "unknown preset '{other}', expected one of: inner, full, earth_moon, sun_earth"
            ))),
        }
    }
}

/// Solar-system body factory
///
/// `scale_factor` multiplies distances, `time_scale` divides orbital
/// periods (so speeds scale by `scale_factor * time_scale`)
#[derive(Debug, Clone, Copy)]
pub struct SolarSystem {
    pub scale_factor: f64,
    pub time_scale: f64,
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self { scale_factor: 1.0, time_scale: 1.0 }
    }
}

impl SolarSystem {
    pub fn new(scale_factor: f64, time_scale: f64) -> Result<Self> {
        for (what, value) in [("scale_factor", scale_factor), ("time_scale", time_scale)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::Configuration(format!("{what} must be positive and finite, got {value}")));
            }
        }
        Ok(Self { scale_factor, time_scale })
    }

    pub fn bodies(&self, preset: Preset) -> Result<Vec<Body>> {
        match preset {
            Preset::Inner => self.inner_solar_system(),
            Preset::Full => self.full_solar_system(),
            Preset::EarthMoon => self.earth_moon(),
            Preset::SunEarth => self.sun_earth(),
        }
    }

    /// The Sun at rest at the origin
    pub fn sun(&self) -> Result<Body> {
        Ok(Body::new(SOLAR_MASS, NVec3::zeros(), NVec3::zeros(), "Sun", "yellow")?.with_radius(696_340.0))
    }

    /// A planet on a circular orbit at `initial_angle` in an orbital plane
    /// tilted by `inclination` about the x axis
    pub fn planet(&self, name: &str, initial_angle: f64, inclination: f64) -> Result<Body> {
        let data = PLANETS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SimError::Configuration(format!("unknown planet '{name}'")))?;

        let distance = data.distance_au * AU * self.scale_factor;
        let period = data.period_years * YEAR / self.time_scale;

        // v = 2 pi r / T
        let speed = 2.0 * PI * distance / period;

        let (sa, ca) = initial_angle.sin_cos();
        let (si, ci) = inclination.sin_cos();

        let x = NVec3::new(distance * ca, distance * sa * ci, distance * sa * si);
        let v = NVec3::new(-speed * sa, speed * ca * ci, speed * ca * si);

        Ok(Body::new(data.mass_ratio * EARTH_MASS, x, v, data.name, data.color)?.with_radius(data.radius_km))
    }

    /// Sun + Mercury, Venus, Earth, Mars a quarter turn apart
    pub fn inner_solar_system(&self) -> Result<Vec<Body>> {
        let mut bodies = vec![self.sun()?];
        for (k, p) in PLANETS[..4].iter().enumerate() {
            bodies.push(self.planet(p.name, k as f64 * PI / 2.0, 0.0)?);
        }
        Ok(bodies)
    }

    /// Sun + all eight planets evenly spread in angle
    pub fn full_solar_system(&self) -> Result<Vec<Body>> {
        let n = PLANETS.len() as f64;
        let mut bodies = vec![self.sun()?];
        for (k, p) in PLANETS.iter().enumerate() {
            bodies.push(self.planet(p.name, k as f64 * 2.0 * PI / n, 0.0)?);
        }
        Ok(bodies)
    }

    pub fn earth_moon(&self) -> Result<Vec<Body>> {
        let distance = 384_400e3 * self.scale_factor;
        let period = 27.3 * DAY / self.time_scale;
        let speed = 2.0 * PI * distance / period;

        let earth = Body::new(EARTH_MASS, NVec3::zeros(), NVec3::zeros(), "Earth", "blue")?.with_radius(6371.0);
        let moon = Body::new(MOON_MASS, NVec3::new(distance, 0.0, 0.0), NVec3::new(0.0, speed, 0.0), "Moon", "gray")?
            .with_radius(1737.0);
        Ok(vec![earth, moon])
    }

    /// Sun at rest, Earth at 1 AU moving tangentially at its mean orbital speed
    pub fn sun_earth(&self) -> Result<Vec<Body>> {
        let distance = AU * self.scale_factor;
        let speed = EARTH_ORBITAL_SPEED * self.scale_factor * self.time_scale;

        let earth = Body::new(EARTH_MASS, NVec3::new(distance, 0.0, 0.0), NVec3::new(0.0, speed, 0.0), "Earth", "blue")?
            .with_radius(6371.0);
        Ok(vec![self.sun()?, earth])
    }
}

impl BodyConfig {
    pub fn to_body(&self) -> Result<Body> {
        let x = NVec3::from(self.position);
        let v = NVec3::from(self.velocity);
        Ok(Body::new(self.mass, x, v, self.name.clone(), self.color.clone())?.with_radius(self.radius))
    }
}

/// Build a configured engine from a scenario description
///
/// Preset bodies come first, then custom bodies in file order. `G` is
/// multiplied by `time_scale^2` so preset orbits stay circular when their
/// periods are compressed
pub fn build_scenario(cfg: ScenarioConfig) -> Result<Engine> {
    let p_cfg = cfg.parameters;
    let s_cfg = cfg.system;

    let solar = SolarSystem::new(s_cfg.scale_factor, s_cfg.time_scale)?;

    #[allow(non_snake_case)]
    let G = p_cfg.gravitational_constant * s_cfg.time_scale * s_cfg.time_scale;
    if s_cfg.time_scale != 1.0 {
        info!(
            "time_scale {} applied: G = {:e} (configured {:e})",
            s_cfg.time_scale, G, p_cfg.gravitational_constant
        );
    }

    let parameters = Parameters {
        h0: p_cfg.time_step,
        eps: p_cfg.softening_length,
        G,
        max_trail_length: p_cfg.max_trail_length,
        snapshot_interval: p_cfg.snapshot_interval,
    };

    let mut engine = Engine::new(parameters, cfg.engine.integrator)?;

    let mut bodies = match s_cfg.preset.as_deref() {
        Some(name) => solar.bodies(name.parse()?)?,
        None => Vec::new(),
    };
    for bc in &s_cfg.bodies {
        bodies.push(bc.to_body()?);
    }
    if bodies.is_empty() {
        return Err(SimError::Configuration("scenario defines no bodies".into()));
    }

    debug!("scenario: {} bodies, integrator {}", bodies.len(), engine.integrator());
    engine.add_bodies(bodies)?;
    Ok(engine)
}
