//! Built-in agent roster for working without a backend.

use crate::records::Agent;

pub fn agents() -> Vec<Agent> {
    [
        (1, "Jennifer Martinez", "Luxury Homes", 4.9, 145, 89),
        (2, "David Kim", "First-Time Buyers", 4.7, 98, 67),
        (3, "Sarah Thompson", "Investment Properties", 4.8, 203, 156),
        (4, "Michael Brown", "Commercial Real Estate", 4.6, 87, 71),
    ]
    .into_iter()
    .map(|(id, name, specialty, rating, leads, deals)| Agent {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        rating,
        leads,
        deals,
        quote: None,
    })
    .collect()
}
