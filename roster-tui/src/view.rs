//! Draws the member table.

use roster_lib::{Record, PAGE_SIZE};

use crate::app::{App, Focus};
use crate::buffer::{text_width, Buffer, Pen, Rect, Rgb, TextStyle};
use crate::hit::{HitMap, Target};
use crate::spinner::Spinner;
use crate::text_field::TextField;

const BACKGROUND: Rgb = Rgb::new(24, 24, 32);
const FOREGROUND: Rgb = Rgb::new(220, 220, 228);
const MUTED: Rgb = Rgb::new(120, 120, 140);
const ACCENT: Rgb = Rgb::new(110, 160, 255);
const DANGER: Rgb = Rgb::new(235, 100, 100);
const SELECTED_BG: Rgb = Rgb::new(40, 52, 80);
const CURSOR_BG: Rgb = Rgb::new(62, 62, 92);
const FIELD_BG: Rgb = Rgb::new(42, 42, 56);

const TEXT: Pen = Pen::new(FOREGROUND, BACKGROUND);

pub const SEARCH_PLACEHOLDER: &str = "Search by name, email, role or id";

/// Screen rows, top to bottom.
const TITLE_ROW: u16 = 0;
const SEARCH_ROW: u16 = 1;
const HEADER_ROW: u16 = 3;
const FIRST_BODY_ROW: u16 = 5;
const FOOTER_ROW: u16 = FIRST_BODY_ROW + PAGE_SIZE as u16 + 1;
const HINT_ROW: u16 = FOOTER_ROW + 2;

const DELETE_SELECTED: &str = "Delete Selected";

const TABLE_HINT: &str = concat!(
    "↑↓ move · space select · a all · e edit · d delete · ",
    "D delete selected · ←→ page · / search · q quit"
);

/// Column layout for a given terminal width.
#[derive(Debug, Clone, Copy)]
struct Columns {
    check: u16,
    id: u16,
    name: u16,
    email: u16,
    role: u16,
    actions: u16,
    right: u16,
}

impl Columns {
    const CHECK_W: u16 = 4;
    const ID_W: u16 = 6;
    const ROLE_W: u16 = 10;
    const ACTIONS_W: u16 = 16;

    fn new(width: u16) -> Self {
        let left = 1;
        let right = width.saturating_sub(1);
        let fixed = Self::CHECK_W + Self::ID_W + Self::ROLE_W + Self::ACTIONS_W;
        let flexible = right.saturating_sub(left).saturating_sub(fixed);
        let name_w = flexible * 2 / 5;
        let email_w = flexible - name_w;

        let check = left;
        let id = check + Self::CHECK_W;
        let name = id + Self::ID_W;
        let email = name + name_w;
        let role = email + email_w;
        let actions = role + Self::ROLE_W;

        Self {
            check,
            id,
            name,
            email,
            role,
            actions,
            right,
        }
    }

    /// Last column (exclusive) usable by text starting at `start`.
    fn end_of(&self, start: u16) -> u16 {
        let next = [self.id, self.name, self.email, self.role, self.actions, self.right]
            .into_iter()
            .filter(|&x| x > start)
            .min()
            .unwrap_or(self.right);
        next.saturating_sub(1).max(start)
    }
}

/// Renders the whole screen into `buf` and records clickable regions.
pub fn render(app: &App, spinner: &Spinner, buf: &mut Buffer, hits: &mut HitMap) {
    hits.clear();
    let width = buf.width();
    buf.fill(Rect::new(0, 0, width, buf.height()), TEXT);

    let cols = Columns::new(width);

    render_title(app, buf, cols);
    render_search(app, buf, hits, cols);
    render_header(app, buf, hits, cols);
    render_rows(app, buf, hits, cols);
    render_footer(app, buf, hits, cols);
    render_hints(app, spinner, buf);
}

fn render_title(app: &App, buf: &mut Buffer, cols: Columns) {
    let table = app.table();
    let title_pen = Pen::new(ACCENT, BACKGROUND).with_style(TextStyle::bold());
    buf.put_str(1, TITLE_ROW, "Members", cols.right, title_pen);

    let summary = format!(
        "{} of {} shown · {} selected",
        table.filtered().len(),
        table.records().len(),
        table.selection().len()
    );
    let x = cols.right.saturating_sub(text_width(&summary));
    buf.put_str(x, TITLE_ROW, &summary, cols.right, Pen::new(MUTED, BACKGROUND));
}

fn render_search(app: &App, buf: &mut Buffer, hits: &mut HitMap, cols: Columns) {
    let label_end = buf.put_str(1, SEARCH_ROW, "Search ", cols.right, TEXT);
    let rect = Rect::new(label_end, SEARCH_ROW, cols.right.saturating_sub(label_end), 1);

    draw_field(buf, rect, &app.search, SEARCH_PLACEHOLDER, app.focus == Focus::Search);
    hits.register(rect, Target::SearchBox);
}

fn render_header(app: &App, buf: &mut Buffer, hits: &mut HitMap, cols: Columns) {
    let pen = Pen::new(ACCENT, BACKGROUND).with_style(TextStyle::bold());
    let y = HEADER_ROW;

    let end = buf.put_str(cols.check, y, checkbox(app.table().select_all()), cols.id, pen);
    hits.register(Rect::new(cols.check, y, end - cols.check, 1), Target::SelectAll);

    for (x, title) in [
        (cols.id, "ID"),
        (cols.name, "Name"),
        (cols.email, "Email"),
        (cols.role, "Role"),
        (cols.actions, "Actions"),
    ] {
        buf.put_str(x, y, title, cols.end_of(x), pen);
    }

    draw_rule(buf, y + 1, cols);
}

fn render_rows(app: &App, buf: &mut Buffer, hits: &mut HitMap, cols: Columns) {
    let table = app.table();
    let rows = table.page_slice();

    if rows.is_empty() {
        let message = if app.is_loading() {
            "Loading members…"
        } else if table.records().is_empty() {
            "No members"
        } else {
            "No members match the search"
        };
        buf.put_str(cols.check, FIRST_BODY_ROW, message, cols.right, Pen::new(MUTED, BACKGROUND));
    }

    for (index, record) in rows.iter().enumerate() {
        let y = FIRST_BODY_ROW + index as u16;
        render_row(app, buf, hits, cols, index, y, record);
    }

    draw_rule(buf, FIRST_BODY_ROW + PAGE_SIZE as u16, cols);
}

fn render_row(
    app: &App,
    buf: &mut Buffer,
    hits: &mut HitMap,
    cols: Columns,
    index: usize,
    y: u16,
    record: &Record,
) {
    let table = app.table();
    let selected = table.is_selected(record.id);
    let under_cursor = app.focus == Focus::Table && index == app.cursor;
    let editing = table.editing_id() == Some(record.id);

    let bg = if under_cursor {
        CURSOR_BG
    } else if selected {
        SELECTED_BG
    } else {
        BACKGROUND
    };
    let pen = Pen::new(FOREGROUND, bg);
    let row_rect = Rect::new(cols.check, y, cols.right.saturating_sub(cols.check), 1);
    buf.fill(row_rect, pen);
    hits.register(row_rect, Target::Row(index));

    let end = buf.put_str(cols.check, y, checkbox(selected), cols.id, pen);
    hits.register(Rect::new(cols.check, y, end - cols.check, 1), Target::RowCheckbox(record.id));

    buf.put_str(cols.id, y, &record.id_text(), cols.end_of(cols.id), pen);

    if editing {
        let field = Rect::new(cols.name, y, cols.end_of(cols.name) - cols.name, 1);
        draw_field(buf, field, &app.editor, "", true);
    } else {
        buf.put_str(cols.name, y, &record.name, cols.end_of(cols.name), pen);
    }

    buf.put_str(cols.email, y, &record.email, cols.end_of(cols.email), pen);
    buf.put_str(cols.role, y, &record.role, cols.end_of(cols.role), pen);

    let buttons = if editing {
        [("[Save]", ACCENT, Target::Save), ("[Cancel]", MUTED, Target::Cancel)]
    } else {
        [
            ("[Edit]", ACCENT, Target::Edit(record.id)),
            ("[Delete]", DANGER, Target::Delete(record.id)),
        ]
    };
    let mut x = cols.actions;
    for (label, fg, target) in buttons {
        let end = buf.put_str(x, y, label, cols.right, Pen::new(fg, bg));
        hits.register(Rect::new(x, y, end - x, 1), target);
        x = end + 1;
    }
}

fn render_footer(app: &App, buf: &mut Buffer, hits: &mut HitMap, cols: Columns) {
    let table = app.table();
    let y = FOOTER_ROW;

    let delete_label = format!("{} ({})", DELETE_SELECTED, table.selection().len());
    let delete_x = cols.right.saturating_sub(text_width(&delete_label));
    let end = buf.put_str(delete_x, y, &delete_label, cols.right, Pen::new(DANGER, BACKGROUND));
    hits.register(Rect::new(delete_x, y, end - delete_x, 1), Target::DeleteSelected);

    let limit = delete_x.saturating_sub(2);
    let current = table.current_page();
    let mut x = cols.check;

    let mut button = |buf: &mut Buffer, x: &mut u16, label: &str, pen: Pen, target: Target| {
        let end = buf.put_str(*x, y, label, limit, pen);
        if end > *x {
            hits.register(Rect::new(*x, y, end - *x, 1), target);
        }
        *x = end + 1;
    };

    button(buf, &mut x, "« First", TEXT, Target::FirstPage);
    button(buf, &mut x, "‹ Previous", TEXT, Target::PrevPage);
    for page in table.page_numbers() {
        let pen = if page == current {
            Pen::new(BACKGROUND, ACCENT).with_style(TextStyle::bold())
        } else {
            Pen::new(FOREGROUND, FIELD_BG)
        };
        button(buf, &mut x, &format!(" {} ", page), pen, Target::Page(page));
    }
    button(buf, &mut x, "Next ›", TEXT, Target::NextPage);
    button(buf, &mut x, "Last »", TEXT, Target::LastPage);
}

fn render_hints(app: &App, spinner: &Spinner, buf: &mut Buffer) {
    let right = buf.width().saturating_sub(1);
    let pen = Pen::new(MUTED, BACKGROUND).with_style(TextStyle::dim());

    if app.is_loading() {
        let end = buf.put_str(1, HINT_ROW, "Loading ", right, pen);
        buf.put_str(end, HINT_ROW, spinner.frame(app.tick), right, Pen::new(ACCENT, BACKGROUND));
        return;
    }

    let hint = match app.focus {
        Focus::Search => "type to filter · enter/esc back to table · ctrl+u clear",
        Focus::Table if app.table().editing_id().is_some() => "enter save · esc cancel",
        Focus::Table => TABLE_HINT,
    };
    buf.put_str(1, HINT_ROW, hint, right, pen);
}

fn draw_field(buf: &mut Buffer, rect: Rect, field: &TextField, placeholder: &str, focused: bool) {
    let pen = Pen::new(FOREGROUND, FIELD_BG);
    buf.fill(rect, pen);
    if rect.width == 0 {
        return;
    }

    if field.text().is_empty() && !placeholder.is_empty() {
        let placeholder_pen = Pen::new(MUTED, FIELD_BG).with_style(TextStyle::dim());
        buf.put_str(rect.x + 1, rect.y, placeholder, rect.right(), placeholder_pen);
    }

    // Keep the cursor visible by scrolling long text
    let visible = rect.width.saturating_sub(2) as usize;
    let skip = field.cursor().saturating_sub(visible);
    let shown: String = field.text().chars().skip(skip).collect();
    if !field.text().is_empty() {
        buf.put_str(rect.x + 1, rect.y, &shown, rect.right(), pen);
    }

    if focused {
        let before: String = field.text().chars().skip(skip).take(field.cursor() - skip).collect();
        let cursor_x = rect.x + 1 + text_width(&before);
        if cursor_x < rect.right() {
            let ch = field.text().chars().nth(field.cursor()).unwrap_or(' ');
            let cursor_pen = Pen::new(BACKGROUND, ACCENT).with_style(TextStyle::underline());
            buf.put_str(cursor_x, rect.y, &ch.to_string(), rect.right(), cursor_pen);
        }
    }
}

fn draw_rule(buf: &mut Buffer, y: u16, cols: Columns) {
    let rule = "─".repeat(cols.right.saturating_sub(cols.check) as usize);
    buf.put_str(cols.check, y, &rule, cols.right, Pen::new(MUTED, BACKGROUND));
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_app(app: &App, width: u16, height: u16) -> (Buffer, HitMap) {
        let mut buf = Buffer::new(width, height);
        let mut hits = HitMap::new();
        render(app, &Spinner::default(), &mut buf, &mut hits);
        (buf, hits)
    }

    fn loaded(count: u64) -> App {
        let mut app = App::new();
        let records = (1..=count)
            .map(|i| Record::new(i, format!("User {i}"), format!("u{i}@x.com"), "member"))
            .collect();
        app.on_loaded(Ok(records));
        app
    }

    /// Column where `needle` first appears on row `y`.
    fn find(buf: &Buffer, y: u16, needle: &str) -> Option<u16> {
        let text = buf.row_text(y);
        text.find(needle).map(|byte| text[..byte].chars().count() as u16)
    }

    #[test]
    fn test_renders_header_and_first_page() {
        let app = loaded(25);
        let (buf, _) = render_app(&app, 100, 24);

        let header = buf.row_text(HEADER_ROW);
        for title in ["ID", "Name", "Email", "Role", "Actions"] {
            assert!(header.contains(title), "missing {title} in {header:?}");
        }
        assert!(buf.row_text(FIRST_BODY_ROW).contains("User 1 "));
        assert!(buf.row_text(FIRST_BODY_ROW + 9).contains("User 10"));
        assert!(buf.row_text(TITLE_ROW).contains("25 of 25 shown"));
    }

    #[test]
    fn test_page_buttons_for_each_page() {
        let app = loaded(25);
        let (buf, hits) = render_app(&app, 100, 24);

        let footer = buf.row_text(FOOTER_ROW);
        assert!(footer.contains(" 1   2   3 "));
        assert!(footer.contains("Delete Selected (0)"));

        let x = find(&buf, FOOTER_ROW, " 3 ").unwrap();
        assert_eq!(hits.hit_test(x + 1, FOOTER_ROW), Some(Target::Page(3)));
    }

    #[test]
    fn test_no_page_buttons_when_empty() {
        let mut app = App::new();
        app.on_loaded(Ok(Vec::new()));
        let (buf, hits) = render_app(&app, 100, 24);

        assert!(buf.row_text(FIRST_BODY_ROW).contains("No members"));
        let footer = buf.row_text(FOOTER_ROW);
        assert!(footer.contains("Previous"));
        assert!(!footer.contains(" 1 "));
        let x = find(&buf, FOOTER_ROW, "Next").unwrap();
        assert_eq!(hits.hit_test(x, FOOTER_ROW), Some(Target::NextPage));
    }

    #[test]
    fn test_loading_state() {
        let app = App::new();
        let (buf, _) = render_app(&app, 100, 24);

        assert!(buf.row_text(FIRST_BODY_ROW).contains("Loading members"));
        assert!(buf.row_text(HINT_ROW).contains("Loading"));
    }

    #[test]
    fn test_row_hit_targets() {
        let app = loaded(3);
        let (buf, hits) = render_app(&app, 100, 24);
        let y = FIRST_BODY_ROW + 1;

        assert_eq!(hits.hit_test(2, y), Some(Target::RowCheckbox(2)));
        let edit = find(&buf, y, "[Edit]").unwrap();
        assert_eq!(hits.hit_test(edit, y), Some(Target::Edit(2)));
        let delete = find(&buf, y, "[Delete]").unwrap();
        assert_eq!(hits.hit_test(delete + 2, y), Some(Target::Delete(2)));
        let id = find(&buf, y, "User 2").unwrap();
        assert_eq!(hits.hit_test(id, y), Some(Target::Row(1)));
    }

    #[test]
    fn test_editing_row_shows_save_cancel() {
        let mut app = loaded(3);
        app.handle_click(Target::Edit(2));
        let (buf, hits) = render_app(&app, 100, 24);
        let y = FIRST_BODY_ROW + 1;

        let row = buf.row_text(y);
        assert!(row.contains("[Save]"));
        assert!(row.contains("[Cancel]"));
        assert!(row.contains("User 2"));
        assert!(!row.contains("[Edit]"));

        let save = find(&buf, y, "[Save]").unwrap();
        assert_eq!(hits.hit_test(save, y), Some(Target::Save));
        assert!(buf.row_text(FIRST_BODY_ROW).contains("[Edit]"));
    }

    #[test]
    fn test_selected_rows_marked() {
        let mut app = loaded(3);
        app.handle_click(Target::SelectAll);
        let (buf, _) = render_app(&app, 100, 24);

        assert!(buf.row_text(HEADER_ROW).contains("[x]"));
        assert!(buf.row_text(FIRST_BODY_ROW + 2).contains("[x]"));
        assert_eq!(buf.get(cols_x(), FIRST_BODY_ROW + 2).unwrap().bg, SELECTED_BG);
        assert!(buf.row_text(FOOTER_ROW).contains("Delete Selected (3)"));
    }

    fn cols_x() -> u16 {
        Columns::new(100).id
    }

    #[test]
    fn test_search_placeholder_and_text() {
        let mut app = loaded(3);
        let (buf, _) = render_app(&app, 100, 24);
        assert!(buf.row_text(SEARCH_ROW).contains(SEARCH_PLACEHOLDER));

        app.handle_click(Target::SearchBox);
        for c in "u3".chars() {
            app.handle_key(crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char(c),
                crossterm::event::KeyModifiers::NONE,
            ));
        }
        let (buf, _) = render_app(&app, 100, 24);
        assert!(buf.row_text(SEARCH_ROW).contains("u3"));
        assert!(!buf.row_text(SEARCH_ROW).contains(SEARCH_PLACEHOLDER));
        assert!(buf.row_text(FIRST_BODY_ROW).contains("User 3"));
        assert!(!buf.row_text(FIRST_BODY_ROW + 1).contains("User"));
    }

    #[test]
    fn test_narrow_terminal_does_not_panic() {
        let app = loaded(25);
        let (buf, _) = render_app(&app, 20, 5);
        assert_eq!(buf.width(), 20);
        let (buf, _) = render_app(&app, 0, 0);
        assert_eq!(buf.height(), 0);
    }
}
