use crate::surface::function::ShapeParams;

pub struct ShapePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub params: ShapeParams,
}

pub const SHAPE_PRESETS: &[ShapePreset] = &[
    ShapePreset {
        name: "Twisted Torus",
        description: "Seven lobes, R=2 a=3",
        params: ShapeParams {
            major_radius: 2.0,
            amplitude: 3.0,
            lobes: 7,
            zoom: 3.0,
        },
    },
    ShapePreset {
        name: "Trefoil Flower",
        description: "Three wide lobes",
        params: ShapeParams {
            major_radius: 2.0,
            amplitude: 2.0,
            lobes: 3,
            zoom: 2.5,
        },
    },
    ShapePreset {
        name: "Gear",
        description: "Many shallow lobes",
        params: ShapeParams {
            major_radius: 2.5,
            amplitude: 1.0,
            lobes: 16,
            zoom: 2.5,
        },
    },
    ShapePreset {
        name: "Shell",
        description: "Small radius, large amplitude",
        params: ShapeParams {
            major_radius: 1.0,
            amplitude: 4.0,
            lobes: 5,
            zoom: 3.5,
        },
    },
];

pub fn find_preset(name: &str) -> Option<usize> {
    SHAPE_PRESETS
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))
}
