use {
    crate::utils::errorfmt::ErrorFmt,
    std::{
        error::Error,
        fmt::{Debug, Display, Formatter},
    },
};

pub type TestResult<T = ()> = Result<T, TestError>;

/// An error with a chain of context messages, innermost last.
pub struct TestError {
    msg: String,
    source: Option<Box<dyn Error + 'static>>,
    context: Vec<String>,
}

impl TestError {
    pub fn new<D: Display>(d: D) -> Self {
        Self {
            msg: d.to_string(),
            source: None,
            context: vec![],
        }
    }

    fn with_context<D: Display>(mut self, d: D) -> Self {
        self.context.push(d.to_string());
        self
    }
}

impl Debug for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in self.context.iter().rev() {
            write!(f, "{}: ", c)?;
        }
        match &self.source {
            Some(e) => Display::fmt(&ErrorFmt(&**e), f),
            None => f.write_str(&self.msg),
        }
    }
}

impl<T: Error + 'static> From<T> for TestError {
    fn from(error: T) -> Self {
        Self {
            msg: error.to_string(),
            source: Some(Box::new(error)),
            context: vec![],
        }
    }
}

pub trait TestErrorExt<T> {
    fn with_context<D, F>(self, f: F) -> TestResult<T>
    where
        D: Display,
        F: FnOnce() -> D;
}

impl<T, E> TestErrorExt<T> for Result<T, E>
where
    E: Into<TestError>,
{
    fn with_context<D, F>(self, f: F) -> TestResult<T>
    where
        D: Display,
        F: FnOnce() -> D,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

macro_rules! bail {
    ($($tt:tt)*) => {{
        let msg = format!($($tt)*);
        return Err(crate::it::test_error::TestError::new(msg));
    }}
}
