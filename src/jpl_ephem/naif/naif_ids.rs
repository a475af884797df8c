//! NAIF integer codes of the bodies found in the JPL planetary kernels.
//!
//! Only the bodies stored by the DE4xx planetary SPK files are listed: the solar system
//! barycenter, the Sun, the planetary system barycenters, and the Earth/Moon pair.
use std::fmt;

use crate::starmap_errors::StarMapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifIds {
    SolarSystemBarycenter,
    MercuryBarycenter,
    VenusBarycenter,
    EarthMoonBarycenter,
    MarsBarycenter,
    JupiterBarycenter,
    SaturnBarycenter,
    UranusBarycenter,
    NeptuneBarycenter,
    PlutoBarycenter,
    Sun,
    Mercury,
    Venus,
    Moon,
    Earth,
}

impl NaifIds {
    pub fn from_id(id: i32) -> Result<Self, StarMapError> {
        use NaifIds::*;
        Ok(match id {
            0 => SolarSystemBarycenter,
            1 => MercuryBarycenter,
            2 => VenusBarycenter,
            3 => EarthMoonBarycenter,
            4 => MarsBarycenter,
            5 => JupiterBarycenter,
            6 => SaturnBarycenter,
            7 => UranusBarycenter,
            8 => NeptuneBarycenter,
            9 => PlutoBarycenter,
            10 => Sun,
            199 => Mercury,
            299 => Venus,
            301 => Moon,
            399 => Earth,
            _ => {
                return Err(StarMapError::EphemerisError(format!(
                    "unknown NAIF body id: {id}"
                )))
            }
        })
    }

    pub fn to_id(&self) -> i32 {
        use NaifIds::*;
        match self {
            SolarSystemBarycenter => 0,
            MercuryBarycenter => 1,
            VenusBarycenter => 2,
            EarthMoonBarycenter => 3,
            MarsBarycenter => 4,
            JupiterBarycenter => 5,
            SaturnBarycenter => 6,
            UranusBarycenter => 7,
            NeptuneBarycenter => 8,
            PlutoBarycenter => 9,
            Sun => 10,
            Mercury => 199,
            Venus => 299,
            Moon => 301,
            Earth => 399,
        }
    }
}

impl From<NaifIds> for i32 {
    fn from(naif_id: NaifIds) -> Self {
        naif_id.to_id()
    }
}

impl TryFrom<i32> for NaifIds {
    type Error = StarMapError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        NaifIds::from_id(id)
    }
}

impl fmt::Display for NaifIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use NaifIds::*;
        let name = match self {
            SolarSystemBarycenter => "Solar System Barycenter",
            MercuryBarycenter => "Mercury Barycenter",
            VenusBarycenter => "Venus Barycenter",
            EarthMoonBarycenter => "Earth-Moon Barycenter",
            MarsBarycenter => "Mars Barycenter",
            JupiterBarycenter => "Jupiter Barycenter",
            SaturnBarycenter => "Saturn Barycenter",
            UranusBarycenter => "Uranus Barycenter",
            NeptuneBarycenter => "Neptune Barycenter",
            PlutoBarycenter => "Pluto Barycenter",
            Sun => "Sun",
            Mercury => "Mercury",
            Venus => "Venus",
            Moon => "Moon",
            Earth => "Earth",
        };
        write!(f, "{name}")
    }
}
