use chrono::NaiveDate;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::model::{DATE_FORMAT, Task, TaskDraft, TaskStatus, parse_date};

/// Single-line text input with a grapheme-aware cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    /// Byte offset into `value`, always on a grapheme boundary
    pub cursor: usize,
    /// Render as bullets
    pub masked: bool,
}

impl TextField {
    pub fn new(value: &str) -> Self {
        TextField {
            value: value.to_string(),
            cursor: value.len(),
            masked: false,
        }
    }

    pub fn masked() -> Self {
        TextField {
            masked: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.len();
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        let clean = s.replace(['\n', '\r'], " ");
        self.value.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.value.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.value.replace_range(self.cursor..end, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(start) = self.prev_boundary() {
            self.cursor = start;
        }
    }

    pub fn right(&mut self) {
        if let Some(end) = self.next_boundary() {
            self.cursor = end;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Text as shown on screen
    pub fn display(&self) -> String {
        if self.masked {
            "\u{2022}".repeat(self.value.graphemes(true).count())
        } else {
            self.value.clone()
        }
    }

    /// Terminal column of the cursor relative to the field start
    pub fn cursor_col(&self) -> usize {
        let before = &self.value[..self.cursor];
        if self.masked {
            before.graphemes(true).count()
        } else {
            UnicodeWidthStr::width(before)
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            email: TextField::default(),
            password: TextField::masked(),
            focus: LoginField::Email,
        }
    }
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password.masked = !self.password.masked;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    FullName,
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub focus: SignupField,
}

impl Default for SignupForm {
    fn default() -> Self {
        SignupForm {
            full_name: TextField::default(),
            email: TextField::default(),
            password: TextField::masked(),
            focus: SignupField::FullName,
        }
    }
}

impl SignupForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            SignupField::FullName => &mut self.full_name,
            SignupField::Email => &mut self.email,
            SignupField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            SignupField::FullName => SignupField::Email,
            SignupField::Email => SignupField::Password,
            SignupField::Password => SignupField::FullName,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            SignupField::FullName => SignupField::Password,
            SignupField::Email => SignupField::FullName,
            SignupField::Password => SignupField::Email,
        };
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password.masked = !self.password.masked;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
    Status,
    DueDate,
}

impl EditorField {
    const ORDER: [EditorField; 4] = [
        EditorField::Title,
        EditorField::Description,
        EditorField::Status,
        EditorField::DueDate,
    ];

    fn offset(self, delta: isize) -> EditorField {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        let len = Self::ORDER.len() as isize;
        Self::ORDER[(idx + delta).rem_euclid(len) as usize]
    }
}

/// The task editor modal's form. It knows nothing about persistence: submit
/// yields a draft and the caller decides between create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Id of the task being edited; `None` when creating
    pub editing: Option<String>,
    pub title: TextField,
    pub description: TextField,
    pub status: TaskStatus,
    pub due_date: TextField,
    pub focus: EditorField,
    /// Required field that blocked the last submit
    pub invalid: Option<EditorField>,
}

impl EditorState {
    /// Empty form, status To-Do, due today
    pub fn for_create(today: NaiveDate) -> Self {
        EditorState {
            editing: None,
            title: TextField::default(),
            description: TextField::default(),
            status: TaskStatus::Todo,
            due_date: TextField::new(&today.format(DATE_FORMAT).to_string()),
            focus: EditorField::Title,
            invalid: None,
        }
    }

    /// Form pre-filled from an existing task
    pub fn for_edit(task: &Task) -> Self {
        EditorState {
            editing: Some(task.id.clone()),
            title: TextField::new(&task.title),
            description: TextField::new(&task.description),
            status: task.status,
            due_date: TextField::new(&task.due_date),
            focus: EditorField::Title,
            invalid: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.offset(1);
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.offset(-1);
    }

    /// Text input under focus; the status field is a select, not text
    pub fn focused_text_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            EditorField::Title => Some(&mut self.title),
            EditorField::Description => Some(&mut self.description),
            EditorField::DueDate => Some(&mut self.due_date),
            EditorField::Status => None,
        }
    }

    /// Emit the four editable fields, or the first required field that blocks submission
    pub fn submit(&mut self) -> Result<TaskDraft, EditorField> {
        let blocked = if self.title.value.trim().is_empty() {
            Some(EditorField::Title)
        } else if parse_date(&self.due_date.value).is_none() {
            Some(EditorField::DueDate)
        } else {
            None
        };
        if let Some(field) = blocked {
            self.invalid = Some(field);
            self.focus = field;
            return Err(field);
        }
        self.invalid = None;
        Ok(TaskDraft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            status: self.status,
            due_date: self.due_date.value.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_editing() {
        let mut f = TextField::default();
        for c in "héllo".chars() {
            f.insert(c);
        }
        assert_eq!(f.value, "héllo");
        f.left();
        f.left();
        f.backspace();
        assert_eq!(f.value, "hélo");
        f.home();
        f.delete();
        assert_eq!(f.value, "élo");
        assert_eq!(f.cursor, 0);
        f.right();
        assert_eq!(f.cursor, 'é'.len_utf8());
        f.end();
        f.insert_str("\nworld");
        assert_eq!(f.value, "élo world");
    }

    #[test]
    fn masked_display() {
        let mut f = TextField::masked();
        f.set("secret");
        assert_eq!(f.display(), "\u{2022}".repeat(6));
        assert_eq!(f.cursor_col(), 6);
        f.masked = false;
        assert_eq!(f.display(), "secret");
    }

    #[test]
    fn login_form_toggles() {
        let mut form = LoginForm::default();
        assert!(form.password.masked);
        form.toggle_password_visibility();
        assert!(!form.password.masked);
        form.focused_mut().insert('a');
        form.next_field();
        form.focused_mut().insert('b');
        assert_eq!(form.email.value, "a");
        assert_eq!(form.password.value, "b");
    }

    #[test]
    fn signup_field_cycle() {
        let mut form = SignupForm::default();
        form.prev_field();
        assert_eq!(form.focus, SignupField::Password);
        form.next_field();
        assert_eq!(form.focus, SignupField::FullName);
    }

    #[test]
    fn create_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let editor = EditorState::for_create(today);
        assert!(!editor.is_edit());
        assert_eq!(editor.due_date.value, "2024-06-01");
        assert_eq!(editor.status, TaskStatus::Todo);
        assert!(editor.title.is_empty());
    }

    #[test]
    fn edit_prefills_and_emits_without_id() {
        let task = Task {
            id: "9".into(),
            title: "Buy milk".into(),
            description: "2 litres".into(),
            status: TaskStatus::InProgress,
            due_date: "2024-06-01".into(),
        };
        let mut editor = EditorState::for_edit(&task);
        assert_eq!(editor.editing.as_deref(), Some("9"));
        assert_eq!(editor.submit().unwrap(), task.draft());
    }

    #[test]
    fn submit_blocks_on_required_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut editor = EditorState::for_create(today);
        editor.focus = EditorField::DueDate;
        assert_eq!(editor.submit(), Err(EditorField::Title));
        assert_eq!(editor.focus, EditorField::Title);
        editor.title.set("   ");
        assert_eq!(editor.submit(), Err(EditorField::Title));

        editor.title.set("Buy milk");
        editor.due_date.set("");
        assert_eq!(editor.submit(), Err(EditorField::DueDate));
        editor.due_date.set("2024-02-30");
        assert_eq!(editor.submit(), Err(EditorField::DueDate));

        editor.due_date.set("2024-06-01");
        let draft = editor.submit().unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, "");
        assert_eq!(editor.invalid, None);
    }

    #[test]
    fn editor_field_order_wraps() {
        assert_eq!(EditorField::DueDate.offset(1), EditorField::Title);
        assert_eq!(EditorField::Title.offset(-1), EditorField::DueDate);
    }
}
