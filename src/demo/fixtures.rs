//! Built-in demo transcripts (electro-slil power tools shop).

use crate::models::{Button, DemoScenario, LinkPreview, Message, ReplySource};
use crate::whatsapp::payload::product_action_buttons;

fn bot(text: &str, time: &str) -> Message {
    Message::BotText {
        text: text.to_string(),
        time: time.to_string(),
    }
}

fn bot_buttons(text: &str, time: &str, buttons: Vec<Button>) -> Message {
    Message::BotButtons {
        text: text.to_string(),
        time: time.to_string(),
        buttons,
    }
}

fn user(text: &str, time: &str) -> Message {
    Message::UserText {
        text: text.to_string(),
        time: time.to_string(),
    }
}

fn select(reply_to: &str, button: &Button, source: ReplySource, time: &str) -> Message {
    Message::UserReplySelection {
        time: time.to_string(),
        reply_to_text: Some(reply_to.to_string()),
        value: Some(button.title.clone()),
        choice_id: Some(button.id.clone()),
        source: Some(source),
    }
}

fn main_menu() -> Vec<Button> {
    vec![
        Button::new("main_price", "מחיר"),
        Button::new("main_stock", "זמינות מלאי"),
        Button::new("main_delivery", "משלוח / איסוף"),
    ]
}

fn categories() -> Vec<Button> {
    vec![
        Button::new("category_cordless", "מברגה / מקדחה נטענת"),
        Button::new("category_rotary", "מקדחה רוטטת"),
        Button::new("category_hammer", "פטישון לעבודות בטון"),
    ]
}

const GREETING: &str = "שלום, איך אוכל לעזור?";
const CATEGORY_PROMPT: &str = "בשמחה. כדי לדייק, איזה סוג אתה מחפש?";
const PRODUCT_PAGE: &str = "https://www.electro-slil.co.il/products/makita-hr2470";

/// All built-in scenarios in carousel order.
pub fn all() -> Vec<DemoScenario> {
    vec![price_inquiry(), stock_check(), agent_handoff(), after_hours()]
}

/// Price question answered through menu buttons and a product link.
pub fn price_inquiry() -> DemoScenario {
    let menu = main_menu();
    let cats = categories();
    DemoScenario {
        title: "שאלת מחיר – מענה מיידי עם כפתורים".to_string(),
        messages: vec![
            user("היי, כמה עולה פטישון?", "16:38"),
            bot_buttons(GREETING, "16:38", menu.clone()),
            select(GREETING, &menu[0], ReplySource::Button, "16:38"),
            bot_buttons(CATEGORY_PROMPT, "16:39", cats.clone()),
            select(CATEGORY_PROMPT, &cats[2], ReplySource::Button, "16:39"),
            Message::BotLink {
                text: Some(format!(
                    "Makita HR2470 – פטישון SDS-Plus 780W\nמחיר: ₪649 כולל מע\"מ\n{}",
                    PRODUCT_PAGE
                )),
                time: "16:39".to_string(),
                link_preview: Some(LinkPreview {
                    url: PRODUCT_PAGE.to_string(),
                    title: "Makita HR2470 פטישון חציבה".to_string(),
                    description: "פטישון SDS-Plus מקצועי, 780W, 3 מצבי עבודה".to_string(),
                    image: None,
                }),
                buttons: product_action_buttons(),
            },
        ],
    }
}

/// Stock availability picked from a list message.
pub fn stock_check() -> DemoScenario {
    let menu = main_menu();
    let list_prompt = "יש לנו מספר דגמים. בחר דגם מהרשימה:";
    let picked = Button::new("prod_bosch_gsb13", "Bosch GSB 13 RE");
    DemoScenario {
        title: "בדיקת מלאי – בחירה מרשימת דגמים".to_string(),
        messages: vec![
            user("יש לכם מקדחה רוטטת של בוש?", "09:12"),
            bot_buttons(GREETING, "09:12", menu.clone()),
            select(GREETING, &menu[1], ReplySource::Button, "09:12"),
            bot(list_prompt, "09:13"),
            select(list_prompt, &picked, ReplySource::List, "09:13"),
            bot(
                "Bosch GSB 13 RE במלאי ✅\nזמין לאיסוף היום בסניף חולון, או משלוח עד 2 ימי עסקים.",
                "09:13",
            ),
        ],
    }
}

/// Full flow ending with a human agent. The product actions come back
/// after the agent answers, minus the quote button the customer already used.
pub fn agent_handoff() -> DemoScenario {
    let menu = main_menu();
    let cats = categories();
    let actions = product_action_buttons();
    let product_text = "מעולה. יש לנו מספר דגמים מקצועיים.\nאחד הדגמים המבוקשים:\n\nMakita HR2470\n\nמה תרצה לעשות?";
    DemoScenario {
        title: "מעבר לנציג – זרימה מלאה".to_string(),
        messages: vec![
            user("שלום", "11:02"),
            bot_buttons(GREETING, "11:02", menu.clone()),
            select(GREETING, &menu[0], ReplySource::Button, "11:02"),
            bot_buttons(CATEGORY_PROMPT, "11:03", cats.clone()),
            select(CATEGORY_PROMPT, &cats[2], ReplySource::Button, "11:03"),
            bot_buttons(product_text, "11:03", actions.clone()),
            select(product_text, &actions[1], ReplySource::Button, "11:04"),
            bot(
                "מעולה.\nמחבר אותך לנציג שיאשר זמינות ומחיר בהתאם לצורך שלך.\nרגע אחד…",
                "11:04",
            ),
            bot(
                "היי, אני דני מאלקטרו סליל.\nשמח לעזור - בודק זמינות ומכין הצעת מחיר מסודרת.",
                "11:05",
            ),
            user("צריך 2 יחידות לאתר בנייה בבת ים", "11:06"),
            bot_buttons(
                "הצעת מחיר ל-2 יחידות נשלחה למייל.\nמשהו נוסף?",
                "11:09",
                actions,
            ),
        ],
    }
}

/// Message outside business hours with a link to the catalog.
pub fn after_hours() -> DemoScenario {
    DemoScenario {
        title: "פנייה אחרי שעות הפעילות".to_string(),
        messages: vec![
            user("ערב טוב, אתם פתוחים מחר?", "22:41"),
            Message::BotLink {
                text: Some(
                    "ערב טוב! אנחנו פתוחים מחר 07:00–17:00.\nבינתיים אפשר לעיין בקטלוג:"
                        .to_string(),
                ),
                time: "22:41".to_string(),
                link_preview: Some(LinkPreview {
                    url: "https://www.electro-slil.co.il/catalog".to_string(),
                    title: "קטלוג כלי עבודה – אלקטרו סליל".to_string(),
                    description: "מברגות, מקדחות, פטישונים ואביזרים".to_string(),
                    image: None,
                }),
                buttons: vec![Button::new("action_human_agent", "נציג אנושי")],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::payload::MAX_BUTTONS;

    #[test]
    fn test_fixtures_respect_button_limit() {
        for scenario in all() {
            for message in &scenario.messages {
                assert!(message.buttons().len() <= MAX_BUTTONS, "{}", scenario.title);
            }
        }
    }

    #[test]
    fn test_handoff_title() {
        assert_eq!(agent_handoff().title, "מעבר לנציג – זרימה מלאה");
    }

    #[test]
    fn test_link_previews_parse() {
        for scenario in all() {
            for message in &scenario.messages {
                if let Message::BotLink {
                    link_preview: Some(preview),
                    ..
                } = message
                {
                    assert_eq!(preview.host().as_deref(), Some("www.electro-slil.co.il"));
                }
            }
        }
    }
}
