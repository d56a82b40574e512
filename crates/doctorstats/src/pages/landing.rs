//! Landing page: what the tool does and how to start

use crate::cli::App;
use crate::components::heading;

const STEPS: [(&str, &str); 3] = [
    (
        "1. Upload Your Data",
        "Upload your medical data as a CSV file: doctorstats datasets upload trial.csv",
    ),
    (
        "2. Choose Analysis",
        "Run descriptive statistics, correlation, comparative, chi-square or regression analysis: doctorstats analyze <dataset-id> --type basic --column age",
    ),
    (
        "3. Get Insights",
        "Read the results as tables and charts, then collect them into reports you can share.",
    ),
];

pub fn render(logged_in: bool, email: Option<&str>) -> String {
    let mut lines = vec![
        heading("Doctor Stats"),
        "Transforming Medical Data into Actionable Insights".to_string(),
        String::new(),
        "How to Use".to_string(),
    ];
    for (title, text) in STEPS {
        lines.push(format!("  {}", title));
        lines.push(format!("     {}", text));
    }
    lines.push(String::new());
    match (logged_in, email) {
        (true, Some(email)) => lines.push(format!(
            "Logged in as {}. Open your dashboard: doctorstats dashboard",
            email
        )),
        (true, None) => {
            lines.push("Logged in. Open your dashboard: doctorstats dashboard".to_string())
        }
        (false, _) => lines.push(
            "Get started: doctorstats register   (or: doctorstats login)".to_string(),
        ),
    }
    lines.join("\n")
}

pub fn run(app: &App) {
    // The profile is not persisted, so only the token tells us about a session here
    let session = app.session();
    let email = session.user().map(|u| u.email);
    let logged_in = session.store().get().is_some();
    println!("{}", render(logged_in, email.as_deref()));
}
