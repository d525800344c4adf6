//! Lambda event adapter for the provisioning handler

use lambda_runtime::{Error, LambdaEvent};
use provision_lib::{InvocationContext, Provisioner};
use serde_json::Value;

/// Run one invocation and hand the result back to the Lambda runtime
pub async fn handle_event(
    provisioner: &Provisioner,
    event: LambdaEvent<Value>,
) -> Result<String, Error> {
    let LambdaEvent {
        payload, context, ..
    } = event;
    let ctx = InvocationContext::new(context.request_id);

    let message = provisioner.handle(&payload, &ctx).await?;
    Ok(message)
}
