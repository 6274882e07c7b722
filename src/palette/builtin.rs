//! Built-in map palette.
//!
//! Colors follow the community map editor defaults for the most common
//! tiles, walls and paints. Values are `0xRRGGBBAA`.

use image::Rgba;

use super::{ColorTable, GlobalColor};

const GLOBALS: &[(GlobalColor, u32)] = &[
    (GlobalColor::Sky, 0x84AAF8FF),
    (GlobalColor::Earth, 0x5C4449FF),
    (GlobalColor::Rock, 0x4A433CFF),
    (GlobalColor::Hell, 0x330000FF),
    (GlobalColor::Water, 0x093DBFC0),
    (GlobalColor::Lava, 0xFD2003FF),
    (GlobalColor::Honey, 0xFEC214C0),
    (GlobalColor::Wire, 0xFF0000FF),
    (GlobalColor::Wire1, 0x0000FFFF),
    (GlobalColor::Wire2, 0x00FF00FF),
    (GlobalColor::Wire3, 0xFFFF00FF),
];

const BLOCKS: &[(u16, u32)] = &[
    (0, 0x976B4BFF),   // dirt
    (1, 0x808080FF),   // stone
    (2, 0x1CD85EFF),   // grass
    (3, 0x1B7A3CFF),   // plants
    (4, 0xFDDD03FF),   // torches
    (5, 0x976B4BFF),   // trees
    (6, 0x8C6550FF),   // iron
    (7, 0x964316FF),   // copper
    (8, 0xB9A417FF),   // gold
    (9, 0xB9C2C3FF),   // silver
    (10, 0x77694FFF),  // closed door
    (11, 0x77694FFF),  // open door
    (12, 0xAE1845FF),  // heart crystal
    (14, 0x7F5C45FF),  // table
    (15, 0x7F5C45FF),  // chair
    (18, 0x7F5C45FF),  // workbench
    (19, 0xB18C51FF),  // platforms
    (21, 0xAE8A1BFF),  // chest
    (22, 0x625FA7FF),  // demonite
    (23, 0x8D89DFFF),  // corrupt grass
    (25, 0x6D5A80FF),  // ebonstone
    (30, 0xA86D44FF),  // wood
    (37, 0x68566BFF),  // meteorite
    (38, 0x808080FF),  // gray brick
    (40, 0xB5533FFF),  // red brick
    (41, 0x2B3D92FF),  // blue brick
    (43, 0x3D8234FF),  // green brick
    (44, 0x8B4287FF),  // pink brick
    (45, 0xC8AF2FFF),  // gold brick
    (53, 0xD3C66FFF),  // sand
    (54, 0xC8F6FEFF),  // glass
    (56, 0x2B2854FF),  // obsidian
    (57, 0x443C3CFF),  // ash
    (58, 0x8E4242FF),  // hellstone
    (59, 0x5C4449FF),  // mud
    (60, 0x8FD71DFF),  // jungle grass
    (63, 0x6E8CB4FF),  // sapphire
    (70, 0x5D7FFFFF),  // mushroom grass
    (75, 0x2B2854FF),  // obsidian brick
    (76, 0x8E4242FF),  // hellstone brick
    (107, 0x0B508FFF), // cobalt
    (108, 0x5BA9A9FF), // mythril
    (109, 0x4EC1E3FF), // hallowed grass
    (111, 0x801A34FF), // adamantite
    (112, 0x67627AFF), // ebonsand
    (116, 0xD5BAD2FF), // pearlsand
    (117, 0xB5A4C1FF), // pearlstone
    (147, 0xD3ECF1FF), // snow
    (161, 0x90C3E8FF), // ice
    (199, 0xD0503AFF), // crimson grass
    (203, 0x7A3A3AFF), // crimstone
];

const WALLS: &[(u16, u32)] = &[
    (1, 0x343434FF),  // stone
    (2, 0x584426FF),  // dirt (unsafe)
    (3, 0x3D3A4EFF),  // ebonstone
    (4, 0x49331DFF),  // wood
    (5, 0x3C3C3CFF),  // gray brick
    (6, 0x502E25FF),  // red brick
    (7, 0x1A1C4BFF),  // blue brick
    (8, 0x1E3922FF),  // green brick
    (9, 0x432141FF),  // pink brick
    (10, 0x5F4F1DFF), // gold brick
    (16, 0x584426FF), // dirt
    (21, 0x9EC6DCC0), // glass
    (27, 0x4E3625FF), // planked
    (59, 0x3A2C20FF), // mud
    (63, 0x1C7042FF), // grass
    (64, 0x284F1AFF), // jungle
    (65, 0x38480EFF), // flower
    (83, 0x4F2525FF), // crimstone
];

const PAINTS: &[(u8, u32)] = &[
    (1, 0xFF0000FF),  // red
    (2, 0xFF7F00FF),  // orange
    (3, 0xFFFF00FF),  // yellow
    (4, 0x7FFF00FF),  // lime
    (5, 0x00FF00FF),  // green
    (6, 0x00FF7FFF),  // teal
    (7, 0x00FFFFFF),  // cyan
    (8, 0x007FFFFF),  // sky blue
    (9, 0x0000FFFF),  // blue
    (10, 0x7F00FFFF), // purple
    (11, 0xFF00FFFF), // violet
    (12, 0xFF007FFF), // pink
    (13, 0xB40000FF), // deep red
    (14, 0xB45A00FF), // deep orange
    (15, 0xB4B400FF), // deep yellow
    (16, 0x5AB400FF), // deep lime
    (17, 0x00B400FF), // deep green
    (18, 0x00B45AFF), // deep teal
    (19, 0x00B4B4FF), // deep cyan
    (20, 0x005AB4FF), // deep sky blue
    (21, 0x0000B4FF), // deep blue
    (22, 0x5A00B4FF), // deep purple
    (23, 0xB400B4FF), // deep violet
    (24, 0xB4005AFF), // deep pink
    (25, 0x4B4B4BFF), // black
    (26, 0xFFFFFFFF), // white
    (27, 0xAFAFAFFF), // gray
    (28, 0xFFB400FF), // brown
    (29, 0x191919FF), // shadow
    (30, 0xC8C8C8FF), // negative
];

fn rgba(value: u32) -> Rgba<u8> {
    Rgba(value.to_be_bytes())
}

/// The default palette used when no palette file is configured.
pub fn builtin_table() -> ColorTable {
    let mut table = ColorTable::new();
    for &(global, value) in GLOBALS {
        table.set_global(global, rgba(value));
    }
    for &(id, value) in BLOCKS {
        table.set_block(id, rgba(value));
    }
    for &(id, value) in WALLS {
        table.set_wall(id, rgba(value));
    }
    for &(id, value) in PAINTS {
        table.set_paint(id, rgba(value));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorKey;

    #[test]
    fn test_builtin_covers_every_global() {
        let table = builtin_table();
        for global in GlobalColor::ALL {
            assert_ne!(table.resolve(ColorKey::Global(global)), Rgba([0, 0, 0, 0]), "{:?}", global);
        }
    }

    #[test]
    fn test_builtin_known_entries() {
        let table = builtin_table();
        assert_eq!(table.resolve(ColorKey::Block(0)), Rgba([0x97, 0x6B, 0x4B, 0xFF]));
        assert_eq!(table.resolve(ColorKey::Paint(1)), Rgba([255, 0, 0, 255]));
        assert_eq!(table.resolve(ColorKey::Wall(1)), Rgba([0x34, 0x34, 0x34, 0xFF]));
    }

    #[test]
    fn test_builtin_has_no_paint_zero() {
        assert_eq!(builtin_table().resolve(ColorKey::Paint(0)), Rgba([0, 0, 0, 0]));
    }
}
