/// Display metadata for one trunked-radio talkgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalkgroupInformation {
    pub tgid: &'static str,
    pub full_name: &'static str,
    pub short_name: &'static str,
}

/// The NORCOM fire channels this service watches. Never mutated after start.
static TALKGROUPS: &[TalkgroupInformation] = &[
    TalkgroupInformation { tgid: "1399", full_name: "NORCOM - Fire Dispatch 1", short_name: "FDisp 1" },
    TalkgroupInformation { tgid: "1389", full_name: "NORCOM - Fire Tactical 1", short_name: "FTAC 1" },
    TalkgroupInformation { tgid: "1387", full_name: "NORCOM - Fire Tactical 2", short_name: "FTAC 2" },
    TalkgroupInformation { tgid: "1385", full_name: "NORCOM - Fire Tactical 3", short_name: "FTAC 3" },
    TalkgroupInformation { tgid: "1383", full_name: "NORCOM - Fire Tactical 4", short_name: "FTAC 4" },
    TalkgroupInformation { tgid: "1381", full_name: "NORCOM - Fire Tactical 5", short_name: "FTAC 5" },
    TalkgroupInformation { tgid: "1379", full_name: "NORCOM - Fire Tactical 6", short_name: "FTAC 6" },
    TalkgroupInformation { tgid: "1377", full_name: "NORCOM - Fire Tactical 7", short_name: "FTAC 7" },
    TalkgroupInformation { tgid: "1963", full_name: "NORCOM - Fire Tactical 8", short_name: "FTAC 8" },
    TalkgroupInformation { tgid: "1965", full_name: "NORCOM - Fire Tactical 9", short_name: "FTAC 9" },
    TalkgroupInformation { tgid: "1967", full_name: "NORCOM - Fire Tactical 10", short_name: "FTAC 10" },
];

/// How dispatchers name the channels over the air. "FDisp 1" is the dispatch
/// channel itself; the rest are the TAC channels as spoken in assignments.
static RADIO_SHORT_CODES: &[(&str, &str)] = &[
    ("FDisp 1", "1399"),
    ("TAC1", "1389"),
    ("TAC2", "1387"),
    ("TAC3", "1385"),
    ("TAC4", "1383"),
    ("TAC5", "1381"),
    ("TAC6", "1379"),
    ("TAC7", "1377"),
    ("TAC8", "1963"),
    ("TAC9", "1965"),
    ("TAC10", "1967"),
];

pub fn talkgroup_from_tgid(tgid: &str) -> Option<&'static TalkgroupInformation> {
    TALKGROUPS.iter().find(|tg| tg.tgid == tgid)
}

/// Case-sensitive exact match on the radio short-code (e.g. "TAC3").
pub fn talkgroup_from_radio_short_code(code: &str) -> Option<&'static TalkgroupInformation> {
    RADIO_SHORT_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .and_then(|(_, tgid)| talkgroup_from_tgid(tgid))
}
