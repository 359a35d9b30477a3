use ragline::domain::{Message, MessageRole};

#[test]
fn given_role_aliases_when_parsing_then_maps_to_canonical_roles() {
    assert_eq!("human".parse::<MessageRole>().unwrap(), MessageRole::User);
    assert_eq!("AI".parse::<MessageRole>().unwrap(), MessageRole::Assistant);
    assert_eq!("system".parse::<MessageRole>().unwrap(), MessageRole::System);
    assert!("narrator".parse::<MessageRole>().is_err());
}

#[test]
fn given_role_when_formatting_then_uses_wire_name() {
    assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    assert_eq!(MessageRole::User.to_string(), "user");
}

#[test]
fn given_helper_constructors_when_building_messages_then_roles_are_set() {
    assert_eq!(Message::user("hi").role, MessageRole::User);
    assert_eq!(Message::assistant("hello").content, "hello");
}
