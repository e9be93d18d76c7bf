use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{AttributeValue, KeysAndAttributes},
    Client,
};

use super::{
    BatchGetRequest, BatchGetResponse, GetRequest, PutRequest, QueryRequest, QueryResponse,
    Storage,
};
use crate::{
    error::StorageError,
    item::Item,
    key::{ItemKey, KeyValue},
    query::SortCondition,
};

/// The DynamoDB-backed storage collaborator.
#[derive(Debug, Clone)]
pub struct DynamoStorage {
    client: Client,
}

impl DynamoStorage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using the ambient AWS configuration (environment, profile,
    /// instance role).
    pub async fn from_env() -> Self {
        use aws_config::BehaviorVersion;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        Self::new(Client::new(&sdk_config))
    }

    /// Connects to a local DynamoDB endpoint with placeholder credentials,
    /// for development against dynamodb-local.
    pub async fn local(endpoint_url: &str) -> Self {
        use aws_config::BehaviorVersion;
        use aws_sdk_dynamodb::config::Credentials;

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region("us-east-1")
            .credentials_provider(Credentials::for_tests())
            .endpoint_url(endpoint_url)
            .load()
            .await;

        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl Storage for DynamoStorage {
    async fn get_item(&self, request: GetRequest) -> Result<Option<Item>, StorageError> {
        let response = self
            .client
            .get_item()
            .table_name(&request.table)
            .set_key(Some(ddb_key(&request.key)))
            .send()
            .await
            .map_err(|err| StorageError::service(DisplayErrorContext(err)))?;

        response
            .item
            .map(|attributes| attributes_to_item(&attributes))
            .transpose()
    }

    async fn batch_get_items(
        &self,
        request: BatchGetRequest,
    ) -> Result<BatchGetResponse, StorageError> {
        let Some(first) = request.keys.first() else {
            return Ok(BatchGetResponse::default());
        };
        let partition_key_name = first.partition.attribute_name().to_string();
        let sort_key_name = first.sort.attribute_name().to_string();

        let keys = request.keys.iter().map(ddb_key).collect();
        let keys_and_attributes = KeysAndAttributes::builder()
            .set_keys(Some(keys))
            .build()
            .map_err(StorageError::service)?;

        let response = self
            .client
            .batch_get_item()
            .request_items(&request.table, keys_and_attributes)
            .send()
            .await
            .map_err(|err| StorageError::service(DisplayErrorContext(err)))?;

        let items = response
            .responses
            .unwrap_or_default()
            .remove(&request.table)
            .unwrap_or_default()
            .iter()
            .map(attributes_to_item)
            .collect::<Result<Vec<_>, _>>()?;

        let unprocessed_keys = response
            .unprocessed_keys
            .unwrap_or_default()
            .remove(&request.table)
            .map(|keys| keys.keys)
            .unwrap_or_default()
            .iter()
            .filter_map(|key| {
                let partition = attribute_string(key.get(&partition_key_name))?;
                let sort = attribute_string(key.get(&sort_key_name))?;
                Some(ItemKey {
                    partition: KeyValue::new(&partition_key_name, partition),
                    sort: KeyValue::new(&sort_key_name, sort),
                })
            })
            .collect();

        Ok(BatchGetResponse {
            items,
            unprocessed_keys,
        })
    }

    async fn put_item(&self, request: PutRequest) -> Result<(), StorageError> {
        self.client
            .put_item()
            .table_name(&request.table)
            .set_item(Some(item_to_attributes(&request.item)?))
            .send()
            .await
            .map_err(|err| StorageError::service(DisplayErrorContext(err)))?;

        Ok(())
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, StorageError> {
        let mut attribute_names = HashMap::from([(
            "#pk".to_string(),
            request.partition.attribute_name().to_string(),
        )]);
        let mut attribute_values = HashMap::from([(
            ":pk".to_string(),
            AttributeValue::S(request.partition.value().to_string()),
        )]);
        let mut key_condition = "#pk = :pk".to_string();

        if let Some(condition) = &request.sort_condition {
            attribute_names.insert("#sk".to_string(), request.sort_key_name.clone());

            match condition {
                SortCondition::Equals(key) => {
                    attribute_values
                        .insert(":sk".to_string(), AttributeValue::S(key.value().to_string()));
                    key_condition.push_str(" AND #sk = :sk");
                }
                SortCondition::BeginsWith(key) => {
                    attribute_values
                        .insert(":sk".to_string(), AttributeValue::S(key.value().to_string()));
                    key_condition.push_str(" AND begins_with(#sk, :sk)");
                }
                SortCondition::Between(lower, upper) => {
                    attribute_values.insert(
                        ":sk_lo".to_string(),
                        AttributeValue::S(lower.value().to_string()),
                    );
                    attribute_values.insert(
                        ":sk_hi".to_string(),
                        AttributeValue::S(upper.value().to_string()),
                    );
                    key_condition.push_str(" AND #sk BETWEEN :sk_lo AND :sk_hi");
                }
            }
        }

        let exclusive_start_key = request
            .exclusive_start_key
            .as_ref()
            .map(item_to_attributes)
            .transpose()?;

        let response = self
            .client
            .query()
            .table_name(&request.table)
            .set_index_name(request.index_name.clone())
            .key_condition_expression(key_condition)
            .set_expression_attribute_names(Some(attribute_names))
            .set_expression_attribute_values(Some(attribute_values))
            .set_limit(request.limit.map(|limit| limit as i32))
            .scan_index_forward(!request.descending)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|err| StorageError::service(DisplayErrorContext(err)))?;

        let items = response
            .items
            .unwrap_or_default()
            .iter()
            .map(attributes_to_item)
            .collect::<Result<Vec<_>, _>>()?;

        let last_evaluated_key = response
            .last_evaluated_key
            .as_ref()
            .map(attributes_to_item)
            .transpose()?;

        Ok(QueryResponse {
            items,
            last_evaluated_key,
        })
    }
}

fn ddb_key(key: &ItemKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            key.partition.attribute_name().to_string(),
            AttributeValue::S(key.partition.value().to_string()),
        ),
        (
            key.sort.attribute_name().to_string(),
            AttributeValue::S(key.sort.value().to_string()),
        ),
    ])
}

fn attribute_string(value: Option<&AttributeValue>) -> Option<String> {
    match value {
        Some(AttributeValue::S(value)) => Some(value.clone()),
        _ => None,
    }
}

fn item_to_attributes(item: &Item) -> Result<HashMap<String, AttributeValue>, StorageError> {
    item.iter()
        .map(|(attribute, value)| Ok((attribute.clone(), to_attribute_value(attribute, value)?)))
        .collect()
}

fn attributes_to_item(attributes: &HashMap<String, AttributeValue>) -> Result<Item, StorageError> {
    attributes
        .iter()
        .map(|(attribute, value)| {
            Ok((attribute.clone(), from_attribute_value(attribute, value)?))
        })
        .collect()
}

fn to_attribute_value(
    attribute: &str,
    value: &serde_json::Value,
) -> Result<AttributeValue, StorageError> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(AttributeValue::Null(true)),
        Value::Bool(value) => Ok(AttributeValue::Bool(*value)),
        Value::Number(value) => Ok(AttributeValue::N(value.to_string())),
        Value::String(value) => Ok(AttributeValue::S(value.clone())),
        Value::Array(values) => Ok(AttributeValue::L(
            values
                .iter()
                .map(|value| to_attribute_value(attribute, value))
                .collect::<Result<_, _>>()?,
        )),
        Value::Object(map) => Ok(AttributeValue::M(
            map.iter()
                .map(|(name, value)| Ok((name.clone(), to_attribute_value(attribute, value)?)))
                .collect::<Result<_, _>>()?,
        )),
    }
}

fn from_attribute_value(
    attribute: &str,
    value: &AttributeValue,
) -> Result<serde_json::Value, StorageError> {
    use serde_json::Value;

    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(value) => Ok(Value::Bool(*value)),
        AttributeValue::S(value) => Ok(Value::String(value.clone())),
        AttributeValue::N(value) => {
            if let Ok(int) = value.parse::<i64>() {
                return Ok(Value::from(int));
            }
            value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| StorageError::Conversion {
                    attribute: attribute.to_string(),
                })
        }
        AttributeValue::L(values) => Ok(Value::Array(
            values
                .iter()
                .map(|value| from_attribute_value(attribute, value))
                .collect::<Result<_, _>>()?,
        )),
        AttributeValue::M(map) => Ok(Value::Object(
            map.iter()
                .map(|(name, value)| Ok((name.clone(), from_attribute_value(name, value)?)))
                .collect::<Result<_, _>>()?,
        )),
        _ => Err(StorageError::Conversion {
            attribute: attribute.to_string(),
        }),
    }
}
