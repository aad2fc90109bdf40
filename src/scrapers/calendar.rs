use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use scraper::{Html, Selector};

/// Control that opens the date picker on a resort page
pub const OPEN_CALENDAR: &str = ".flex.items-center.px-20.py-12.text-middleGrey";
/// Control that pages the picker one month forward
pub const NEXT_MONTH: &str = "button[aria-label='Next-Custom']";
/// Month/year caption of the visible month
pub const MONTH_CAPTION: &str = "span[id^='react-day-picker']";
/// Enabled day cells of the visible month
pub const DAY_BUTTON: &str = ".rdp-cell button:not([disabled])";

const DAY_DATE: &str = "time";
const DAY_PRICE: &str = ".text-b5";

const HEBREW_MONTHS: [(&str, u32); 12] = [
    ("ינו", 1),
    ("פבר", 2),
    ("מרץ", 3),
    ("אפר", 4),
    ("מאי", 5),
    ("יוני", 6),
    ("יולי", 7),
    ("אוג", 8),
    ("ספט", 9),
    ("אוק", 10),
    ("נוב", 11),
    ("דצמ", 12),
];

const ENGLISH_MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Caption of the month currently shown by the picker
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCaption {
    /// Caption text as displayed, e.g. "דצמ 2024"
    pub label: String,
    /// `None` when the month name is not recognised
    pub month: Option<u32>,
    pub year: i32,
}

impl MonthCaption {
    /// Parse a "<month> <year>" caption.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let month_text = parts.next()?;
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            label: format!("{} {}", month_text, year),
            month: month_number(month_text),
            year,
        })
    }

    /// (year, month) ordering key, when the month is known.
    pub fn year_month(&self) -> Option<(i32, u32)> {
        self.month.map(|m| (self.year, m))
    }
}

/// Month number for a Hebrew or English month abbreviation.
pub fn month_number(text: &str) -> Option<u32> {
    if let Some((_, n)) = HEBREW_MONTHS.iter().find(|(name, _)| *name == text) {
        return Some(*n);
    }

    let lower = text.to_lowercase();
    ENGLISH_MONTHS
        .iter()
        .position(|abbr| lower.starts_with(abbr))
        .map(|idx| idx as u32 + 1)
}

/// One enabled day cell
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: Option<NaiveDate>,
    /// Raw price text, `None` when the cell shows no price
    pub price_text: Option<String>,
}

/// Everything read from one month page of the picker
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub caption: Option<MonthCaption>,
    pub days: Vec<DayCell>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {:?}", css, e))
}

/// Parse the picker out of a page (or fragment) HTML.
///
/// The picker is a react-day-picker widget: a caption span with the month
/// label and one `.rdp-cell` per day. Enabled days carry a `<time>` element
/// and, when bookable, a price element.
pub fn parse_calendar(html: &str) -> Result<CalendarView> {
    let document = Html::parse_document(html);

    let caption_selector = selector(MONTH_CAPTION)?;
    let day_selector = selector(DAY_BUTTON)?;
    let date_selector = selector(DAY_DATE)?;
    let price_selector = selector(DAY_PRICE)?;

    let caption = document
        .select(&caption_selector)
        .next()
        .and_then(|el| MonthCaption::parse(&el.text().collect::<String>()));

    let days = document
        .select(&day_selector)
        .map(|button| {
            let date = button
                .select(&date_selector)
                .next()
                .and_then(|time| time.value().attr("datetime"))
                .and_then(parse_day_date);

            let price_text = button
                .select(&price_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());

            DayCell { date, price_text }
        })
        .collect();

    Ok(CalendarView { caption, days })
}

/// Accepts "2024-12-07" as well as full timestamps like "2024-12-07T00:00:00".
fn parse_day_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Strip currency symbol, thousands separators and spacing from a price text.
/// Returns `None` when nothing is left.
pub fn clean_price(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '€' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Numeric value of a price text, `None` when empty or not a number.
pub fn parse_price(text: &str) -> Option<f64> {
    clean_price(text)?.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// The last month of the season that starts at `first`.
pub fn season_horizon(first: (i32, u32), horizon_month: u32) -> (i32, u32) {
    let (year, month) = first;
    if month <= horizon_month {
        (year, horizon_month)
    } else {
        (year + 1, horizon_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECEMBER: &str = r#"
        <html><body>
        <div class="rdp">
          <span id="react-day-picker-12">דצמ 2024</span>
          <table><tbody><tr>
            <td class="rdp-cell"><button disabled><time datetime="2024-12-01">1</time></button></td>
            <td class="rdp-cell"><button><time datetime="2024-12-07">7</time><span class="text-b5">1,234€</span></button></td>
            <td class="rdp-cell"><button><time datetime="2024-12-08">8</time></button></td>
            <td class="rdp-cell"><button><time datetime="2024-12-14T00:00:00.000Z">14</time><span class="text-b5"> 2,050 € </span></button></td>
          </tr></tbody></table>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_calendar_reads_enabled_days() {
        let view = parse_calendar(DECEMBER).unwrap();

        let caption = view.caption.unwrap();
        assert_eq!(caption.label, "דצמ 2024");
        assert_eq!(caption.year_month(), Some((2024, 12)));

        assert_eq!(view.days.len(), 3);
        assert_eq!(view.days[0].date, NaiveDate::from_ymd_opt(2024, 12, 7));
        assert_eq!(view.days[0].price_text.as_deref(), Some("1,234€"));
        assert_eq!(view.days[1].price_text, None);
        assert_eq!(view.days[2].date, NaiveDate::from_ymd_opt(2024, 12, 14));
        assert_eq!(view.days[2].price_text.as_deref(), Some("2,050 €"));
    }

    #[test]
    fn test_parse_calendar_without_picker() {
        let view = parse_calendar("<html><body><p>loading</p></body></html>").unwrap();
        assert!(view.caption.is_none());
        assert!(view.days.is_empty());
    }

    #[test]
    fn test_caption_parsing() {
        assert_eq!(MonthCaption::parse("אפר 2025").unwrap().year_month(), Some((2025, 4)));
        assert_eq!(MonthCaption::parse("January 2025").unwrap().month, Some(1));
        assert_eq!(MonthCaption::parse("??? 2025").unwrap().month, None);
        assert!(MonthCaption::parse("דצמ").is_none());
        assert!(MonthCaption::parse("דצמ twenty").is_none());
    }

    #[test]
    fn test_price_cleaning() {
        assert_eq!(clean_price("1,234€").as_deref(), Some("1234"));
        assert_eq!(parse_price("1,234€"), Some(1234.0));
        assert_eq!(parse_price("€"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("call us"), None);
    }

    #[test]
    fn test_season_horizon() {
        assert_eq!(season_horizon((2024, 12), 4), (2025, 4));
        assert_eq!(season_horizon((2025, 1), 4), (2025, 4));
        assert_eq!(season_horizon((2025, 4), 4), (2025, 4));
        assert_eq!(season_horizon((2025, 5), 4), (2026, 4));
    }
}
