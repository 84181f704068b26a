use domain::SystemContext;

#[test]
fn system_context_builds() {
    let ctx = SystemContext::new(3, 7, "Chateau", "owner");

    assert_eq!(ctx.system_id, 3);
    assert_eq!(ctx.user_id, 7);
    assert_eq!(ctx.system_name, "Chateau");
    assert_eq!(ctx.username, "owner");
}

#[test]
fn default_context_is_placeholder() {
    let ctx = SystemContext::default();
    assert_eq!(ctx.system_id, 0);
    assert_eq!(ctx.system_name, "No System");
}
