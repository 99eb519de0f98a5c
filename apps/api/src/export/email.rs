use crate::models::{BusinessProfile, EmailKind, EmailTemplate};

const STYLE: &str = r#"        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 600px;
            margin: 0 auto;
            padding: 20px;
        }
        .header {
            text-align: center;
            padding-bottom: 20px;
            border-bottom: 1px solid #eee;
        }
        .content {
            padding: 20px 0;
        }
        .footer {
            text-align: center;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 12px;
            color: #777;
        }
        .cta {
            display: inline-block;
            background-color: #4CAF50;
            color: white;
            padding: 10px 20px;
            text-decoration: none;
            border-radius: 5px;
            margin: 20px 0;
        }"#;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full HTML document for one email template, styles inlined.
pub fn render_email_html(
    template: &EmailTemplate,
    kind: EmailKind,
    profile: &BusinessProfile,
    year: i32,
) -> String {
    let name = escape(&profile.name);
    let greeting = escape(template.greeting.as_deref().unwrap_or("Hello,"));
    let cta = escape(template.cta.as_deref().unwrap_or("Learn More"));
    let sign_off = escape(template.sign_off.as_deref().unwrap_or("Best regards,"));

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{name} - {title} Email</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="header">
        <h1>{name}</h1>
        <p>{business_type} in {location}</p>
    </div>

    <div class="content">
        <h2>{subject}</h2>
        <p>{greeting}</p>

        <div class="email-body">
            {body}
        </div>

        <a href="#" class="cta">{cta}</a>
    </div>

    <div class="footer">
        <p>{sign_off}<br>
        {name} Team</p>
        <p>&copy; {year} {name}. All rights reserved.</p>
        <p>You are receiving this email because you signed up for updates from {name}.</p>
    </div>
</body>
</html>
"##,
        title = kind.title(),
        business_type = escape(&profile.business_type),
        location = escape(&profile.location),
        subject = escape(&template.subject),
        body = escape(&template.body),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::business::sample_profile;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let html = render_email_html(
            &EmailTemplate::new("Hi", "Fresh loaves daily"),
            EmailKind::Welcome,
            &sample_profile(),
            2024,
        );

        assert!(html.contains("<title>Sunrise Bakery - Welcome Email</title>"));
        assert!(html.contains("<p>Bakery in Portland</p>"));
        assert!(html.contains("<h2>Hi</h2>"));
        assert!(html.contains(r##"<a href="#" class="cta">Learn More</a>"##));
        assert!(html.contains("<p>Hello,</p>"));
        assert!(html.contains(">Learn More</a>"));
        assert!(html.contains("Best regards,<br>"));
        assert!(html.contains("Fresh loaves daily"));
        assert!(html.contains("&copy; 2024 Sunrise Bakery. All rights reserved."));
    }

    #[test]
    fn test_explicit_fields_and_escaping() {
        let template = EmailTemplate {
            subject: "Sale".into(),
            body: "Buy 2 <get 1> free & more".into(),
            greeting: Some("Hey friends!".into()),
            cta: Some("Shop now".into()),
            sign_off: Some("Cheers,".into()),
        };
        let html = render_email_html(&template, EmailKind::Promotional, &sample_profile(), 2025);

        assert!(html.contains("<h2>Sale</h2>"));
        assert!(html.contains("<p>Hey friends!</p>"));
        assert!(html.contains(">Shop now</a>"));
        assert!(html.contains("Cheers,<br>"));
        assert!(html.contains("Buy 2 &lt;get 1&gt; free &amp; more"));
    }
}
