//! Fixed vocabularies shared by the name and team extractors.
//!
//! Entries are stored lowercase unless noted; callers lowercase the token
//! before comparing.

/// Known club names. Multi-word entries are kept together by the team
/// extractor; every entry is rejected as a player name.
pub const KNOWN_TEAMS: &[&str] = &[
  // KHL
  "Авангард",
  "Автомобилист",
  "Адмирал",
  "Ак Барс",
  "Амур",
  "Барыс",
  "Динамо М",
  "Динамо Мн",
  "Лада",
  "Локомотив",
  "Металлург Мг",
  "Нефтехимик",
  "СКА",
  "Салават Юлаев",
  "Северсталь",
  "Сибирь",
  "Спартак",
  "Торпедо",
  "Трактор",
  "ХК Сочи",
  "ЦСКА",
  "Шанхайские Драконы",
  "Южный Урал",
  "Омские Крылья",
  // Champions Hockey League
  "Айсберен Берлин",
  "Гренобль",
  "Фиштаун Пингвинз",
  "Лукко",
  "Больцано",
  "Маунтфилд",
  "Лозанна",
  "Ингольштадт",
  "Берн",
  "Комета Брно",
  "Цуг",
  "Белфаст Джайантс",
  "Оденсе Бульдогс",
  "Клагенфуртер",
  "ГКС Тыхы",
  "Лулео",
  "Брюнес",
  "Цюрих Лайонс",
  "Ильвес",
  "Сторхамар",
];

/// Home cities of the clubs above; pages list them next to team names.
pub const TEAM_CITIES: &[&str] = &[
  "Омск",
  "Екатеринбург",
  "Владивосток",
  "Казань",
  "Хабаровск",
  "Астана",
  "Москва",
  "Минск",
  "Тольятти",
  "Ярославль",
  "Магнитогорск",
  "Нижнекамск",
  "Санкт-Петербург",
  "Уфа",
  "Череповец",
  "Новосибирская область",
  "Нижний Новгород",
  "Челябинск",
  "Сочи",
  "Шанхай",
];

/// Lowercase fragments that never occur in a player name: club nicknames,
/// match-status words, period labels, countries. Matched as substrings.
pub const NAME_DENYLIST: &[&str] = &[
  // club nicknames and fragments
  "комета",
  "цюрих",
  "бельфаст",
  "айсберен",
  "оденсе",
  "фиштаун",
  "академия",
  "красная",
  "армия",
  "стальные",
  "лисы",
  "львы",
  "пингвины",
  "медведи",
  "собаки",
  "тигры",
  "волки",
  "орлы",
  "крылья",
  "команда",
  "клуб",
  "торпедо",
  "ростов",
  "динамо",
  "химик",
  "рязань",
  "металлург",
  "дизель",
  "горняк",
  "югра",
  "магнитка",
  // match status and periods
  "окончен",
  "завершен",
  "матч",
  "игра",
  "тайм",
  "период",
  "овертайм",
  "буллиты",
  "ended",
  "period",
  "overtime",
  "shootout",
  // countries and leagues
  "россия",
  "канада",
  "сша",
  "германия",
  "спб",
];

/// Short position and league labels. Matched as whole words, since as
/// substrings they would reject ordinary surnames.
pub const NAME_LABELS: &[&str] = &["нк", "вр", "зщ", "нп", "акм"];

/// Tokens that mark a match's state rather than a team.
pub const STATUS_WORDS: &[&str] = &["ended", "ot", "so", "окончен", "завершен", "от", "б"];

/// Tokens that separate the two teams in a summary line.
pub const DASHES: &[char] = &['-', '–', '—'];

/// Words that mark an officials row in the match-info block.
pub const REFEREE_WORDS: &[&str] = &["судья", "линейный", "рефери", "referee", "linesman"];

/// Whether `lower` (already lowercased) names a known team or city exactly.
pub fn is_team_or_city(lower: &str) -> bool {
  KNOWN_TEAMS
    .iter()
    .chain(TEAM_CITIES)
    .any(|known| known.to_lowercase() == lower)
}

/// Whether `lower` is one word of some known team name.
pub fn is_known_team_word(lower: &str) -> bool {
  KNOWN_TEAMS
    .iter()
    .flat_map(|team| team.split_whitespace())
    .any(|part| part.to_lowercase() == lower)
}

/// Length of the longest multi-word known team that `tokens` starts with.
pub fn known_team_run(tokens: &[&str]) -> Option<usize> {
  KNOWN_TEAMS
    .iter()
    .map(|team| team.split_whitespace().collect::<Vec<_>>())
    .filter(|parts| parts.len() > 1 && parts.len() <= tokens.len())
    .filter(|parts| {
      parts
        .iter()
        .zip(tokens)
        .all(|(part, token)| part.to_lowercase() == token.to_lowercase())
    })
    .map(|parts| parts.len())
    .max()
}

pub fn is_status_word(token: &str) -> bool {
  let lower = token.to_lowercase();
  STATUS_WORDS.contains(&lower.as_str())
}

pub fn is_dash(token: &str) -> bool {
  let mut chars = token.chars();
  matches!((chars.next(), chars.next()), (Some(c), None) if DASHES.contains(&c))
}
