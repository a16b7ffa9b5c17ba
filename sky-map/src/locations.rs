use common::models::{Location, View};

/// San Francisco neighborhoods plus a few outer Bay Area towns
const NEIGHBORHOODS: &[(&str, f64, f64)] = &[
    ("Downtown", 37.7879, -122.4074),
    ("Mission", 37.7599, -122.4148),
    ("Marina", 37.8037, -122.4368),
    ("Inner Sunset", 37.7601, -122.4657),
    ("Outer Sunset", 37.7551, -122.4947),
    ("Inner Richmond", 37.7799, -122.4631),
    ("Outer Richmond", 37.7781, -122.4947),
    ("Castro", 37.7609, -122.4350),
    ("Noe Valley", 37.7502, -122.4337),
    ("SOMA", 37.7785, -122.3950),
    ("Haight-Ashbury", 37.7692, -122.4481),
    ("Pacific Heights", 37.7925, -122.4382),
    ("Tenderloin", 37.7847, -122.4141),
    ("Excelsior", 37.7257, -122.4244),
    ("Bayview", 37.7296, -122.3896),
    ("North Beach", 37.8061, -122.4103),
    ("Bernal Heights", 37.7394, -122.4156),
    ("Presidio", 37.7989, -122.4662),
    ("Oakland", 37.8044, -122.2712),
    ("Berkeley", 37.8716, -122.2727),
    ("South SF", 37.6547, -122.4077),
    ("Palo Alto", 37.4419, -122.1430),
];

/// Hand-picked points covering the city and nearby coast
const CITYWIDE: &[(&str, f64, f64)] = &[
    ("Point 1", 37.7587, -122.4146),
    ("Point 2", 37.7744, -122.4102),
    ("Point 3", 37.8006, -122.4071),
    ("Point 4", 37.796, -122.4644),
    ("Point 5", 37.7716, -122.4457),
    ("Point 6", 37.7686, -122.4672),
    ("Point 7", 37.7675, -122.4907),
    ("Point 8", 37.7762, -122.4967),
    ("Point 9", 37.7600, -122.4477),
    ("Point 10", 37.7763, -122.4353),
    ("Point 11", 37.7854, -122.4305),
    ("Point 12", 37.786, -122.4493),
    ("Point 13", 37.7803, -122.4653),
    ("Point 14", 37.7971, -122.4366),
    ("Point 15", 37.7598, -122.3991),
    ("Point 16", 37.7427, -122.4157),
    ("Point 17", 37.7621, -122.4353),
    ("Point 18", 37.7595, -122.4269),
    ("Point 19", 37.752, -122.4326),
    ("Point 20", 37.7511, -122.5024),
    ("Point 21", 37.7514, -122.4723),
    ("Point 22", 37.7362, -122.4861),
    ("Point 23", 37.7398, -122.4543),
    ("Point 24", 37.751, -122.4475),
    ("Point 25", 37.7345, -122.3943),
    ("Point 26", 37.7252, -122.42),
    ("Point 27", 37.7232, -122.4629),
    ("Point 28", 37.7877, -122.4055),
    ("Point 29", 37.7402, -122.4332),
    ("Point 30", 37.7706, -122.393),
    ("Point 31", 37.7236, -122.4807),
    ("Point 32", 37.7508, -122.4842),
    ("Point 33", 37.7257, -122.4354),
    ("Point 34", 37.7687, -122.4224),
    ("Point 35", 37.6919, -122.4766),
    ("Point 36", 37.6528, -122.4014),
    ("Point 37", 37.7073, -122.4155),
    ("Point 38", 37.5619, -122.3245),
    ("Point 39", 37.5934, -122.4969),
    ("Point 40", 37.4631, -122.4299),
    ("Point 41", 37.809, -122.2792),
    ("Point 42", 37.867, -122.2744),
    ("Point 43", 37.4441, -122.1707),
    ("Point 44", 37.8556, -122.4843),
    ("Point 45", 37.8279, -122.4986),
    ("Point 46", 37.9042, -122.6042),
    ("Point 47", 37.8047, -122.4746),
    ("Point 48", 37.7577, -122.4585),
    ("Point 49", 37.3371, -121.9002),
];

/// Downtown San Francisco, used for the daily sunrise/sunset lookup
pub fn sun_reference() -> Location {
    Location::new("Downtown San Francisco", 37.7749, -122.4194)
}

pub fn for_view(view: View) -> Vec<Location> {
    let table = match view {
        View::Neighborhoods => NEIGHBORHOODS,
        View::Citywide => CITYWIDE,
    };
    table
        .iter()
        .map(|&(name, lat, lon)| Location::new(name, lat, lon))
        .collect()
}
