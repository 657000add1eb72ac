//! Hand-authored 10x10 layouts, one per level. Row 0 is the top edge and the
//! player always starts on row 1, column 1.

pub const LEVEL_ONE: [&str; 10] = [
    "##########",
    "#..#....E#",
    "#.G#.##..#",
    "#....#M..#",
    "##.#.#...#",
    "#..#...#.#",
    "#.X#.M.#.#",
    "#..##..#.#",
    "#......#A#",
    "##########",
];

pub const LEVEL_TWO: [&str; 10] = [
    "##########",
    "#...W....#",
    "#.W.W.WW.#",
    "#.W...M..#",
    "#.WWW.W.X#",
    "#...G.W..#",
    "#.W.W.W.M#",
    "#.W...W..#",
    "#E..M.WS.#",
    "##########",
];

pub const LEVEL_THREE: [&str; 10] = [
    "##########",
    "#....#..C#",
    "#.##.#.#.#",
    "#..#...#.#",
    "##.#M#.X.#",
    "#..#.#...#",
    "#.M..G.#.#",
    "#.##.#.#M#",
    "#....X..E#",
    "##########",
];

pub const LEVEL_FOUR: [&str; 10] = [
    "##########",
    "#...#...H#",
    "#.#.#.#..#",
    "#.#...#M.#",
    "#.##X##..#",
    "#...G..#.#",
    "#.M#.B.#.#",
    "#..#...X.#",
    "#E.#.M...#",
    "##########",
];
