// @generated by protoc-gen-errors from shop/v1/order.proto. Do not edit.

/// `ERROR_OUT_OF_STOCK` (failed_precondition): Product {{product_id}} is out of stock
pub const OUT_OF_STOCK: proto_errors::ErrorCode = proto_errors::ErrorCode::new(
    "ERROR_OUT_OF_STOCK",
);
/// `ERROR_CARD_DECLINED` (failed_precondition): Card ending in {{last4}} was declined
pub const CARD_DECLINED: proto_errors::ErrorCode = proto_errors::ErrorCode::new(
    "ERROR_CARD_DECLINED",
);
/// `ERROR_PAYMENT_TIMEOUT` (deadline_exceeded): Payment provider timed out
pub const PAYMENT_TIMEOUT: proto_errors::ErrorCode = proto_errors::ErrorCode::new(
    "ERROR_PAYMENT_TIMEOUT",
);
/// `ERROR_TYPE` (invalid_argument): Unsupported type {{type}}
pub const TYPE: proto_errors::ErrorCode = proto_errors::ErrorCode::new("ERROR_TYPE");
/// Error definitions declared in `shop/v1/order.proto`
pub fn definitions() -> ::std::vec::Vec<proto_errors::ErrorDefinition> {
    ::std::vec![
        proto_errors::ErrorDefinition::new(OUT_OF_STOCK.as_str(),
        "Product {{product_id}} is out of stock",
        proto_errors::StatusClass::FailedPrecondition, false,),
        proto_errors::ErrorDefinition::new(CARD_DECLINED.as_str(),
        "Card ending in {{last4}} was declined",
        proto_errors::StatusClass::FailedPrecondition, false,),
        proto_errors::ErrorDefinition::new(PAYMENT_TIMEOUT.as_str(),
        "Payment provider timed out", proto_errors::StatusClass::DeadlineExceeded,
        true,), proto_errors::ErrorDefinition::new(TYPE.as_str(),
        "Unsupported type {{type}}", proto_errors::StatusClass::InvalidArgument,
        false,)
    ]
}
/// Register every definition of this file
pub fn register(registry: &proto_errors::Registry) {
    registry.register_all(definitions());
}
/// Message values for `ERROR_OUT_OF_STOCK`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutOfStockParams {
    /// Value for `{{product_id}}`
    pub product_id: ::std::string::String,
}
impl proto_errors::TemplateValues for OutOfStockParams {
    fn value(&self, name: &str) -> ::std::option::Option<&str> {
        match name {
            "product_id" => ::std::option::Option::Some(self.product_id.as_str()),
            _ => ::std::option::Option::None,
        }
    }
}
/// Build a `ERROR_OUT_OF_STOCK` status
pub fn out_of_stock(
    kit: &proto_errors::ErrorKit,
    params: &OutOfStockParams,
) -> proto_errors::tonic::Status {
    kit.new_error(&OUT_OF_STOCK, params)
}
/// Whether `status` carries `ERROR_OUT_OF_STOCK`
pub fn is_out_of_stock(
    kit: &proto_errors::ErrorKit,
    status: &proto_errors::tonic::Status,
) -> bool {
    kit.is(status, &OUT_OF_STOCK)
}
/// Message values for `ERROR_CARD_DECLINED`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDeclinedParams {
    /// Value for `{{last4}}`
    pub last4: ::std::string::String,
}
impl proto_errors::TemplateValues for CardDeclinedParams {
    fn value(&self, name: &str) -> ::std::option::Option<&str> {
        match name {
            "last4" => ::std::option::Option::Some(self.last4.as_str()),
            _ => ::std::option::Option::None,
        }
    }
}
/// Build a `ERROR_CARD_DECLINED` status
pub fn card_declined(
    kit: &proto_errors::ErrorKit,
    params: &CardDeclinedParams,
) -> proto_errors::tonic::Status {
    kit.new_error(&CARD_DECLINED, params)
}
/// Whether `status` carries `ERROR_CARD_DECLINED`
pub fn is_card_declined(
    kit: &proto_errors::ErrorKit,
    status: &proto_errors::tonic::Status,
) -> bool {
    kit.is(status, &CARD_DECLINED)
}
/// Build a `ERROR_PAYMENT_TIMEOUT` status
pub fn payment_timeout(kit: &proto_errors::ErrorKit) -> proto_errors::tonic::Status {
    kit.new_error(&PAYMENT_TIMEOUT, &proto_errors::NoValues)
}
/// Whether `status` carries `ERROR_PAYMENT_TIMEOUT`
pub fn is_payment_timeout(
    kit: &proto_errors::ErrorKit,
    status: &proto_errors::tonic::Status,
) -> bool {
    kit.is(status, &PAYMENT_TIMEOUT)
}
/// Message values for `ERROR_TYPE`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeParams {
    /// Value for `{{type}}`
    pub type_: ::std::string::String,
}
impl proto_errors::TemplateValues for TypeParams {
    fn value(&self, name: &str) -> ::std::option::Option<&str> {
        match name {
            "type" => ::std::option::Option::Some(self.type_.as_str()),
            _ => ::std::option::Option::None,
        }
    }
}
/// Build a `ERROR_TYPE` status
pub fn type_(
    kit: &proto_errors::ErrorKit,
    params: &TypeParams,
) -> proto_errors::tonic::Status {
    kit.new_error(&TYPE, params)
}
/// Whether `status` carries `ERROR_TYPE`
pub fn is_type(kit: &proto_errors::ErrorKit, status: &proto_errors::tonic::Status) -> bool {
    kit.is(status, &TYPE)
}
