use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use url::Url;

use crate::auth;
use crate::credentials::Credentials;
use crate::error::CosmosError;
use crate::types::{
    CollectionListResponse, CollectionMeta, DatabaseListResponse, DatabaseMeta, QueryBody,
    QueryOptions, QueryResponse,
};

/// The document-database operations the shell consumes.
///
/// All calls are synchronous; a structured request failure surfaces as
/// [`CosmosError::Request`] carrying the server's message payload.
pub trait DocumentClient: Send + Sync {
    fn list_databases(&self) -> Result<Vec<DatabaseMeta>, CosmosError>;

    fn list_collections(&self, database: &str) -> Result<Vec<CollectionMeta>, CosmosError>;

    fn query_documents(
        &self,
        database: &str,
        collection: &str,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<JsonValue>, CosmosError>;
}

/// CosmosDB SQL-API client over blocking HTTP.
///
/// Credentials are taken once at construction; there is no pooling and no
/// reconnect logic. An unparseable endpoint or key fails construction.
pub struct CosmosClient {
    http: Client,
    endpoint: Url,
    key: Vec<u8>,
}

impl CosmosClient {
    pub fn connect(credentials: &Credentials) -> Result<Self, CosmosError> {
        let endpoint = Url::parse(&credentials.endpoint)?;
        let key = auth::decode_key(&credentials.account_key)?;

        Ok(Self {
            http: Client::new(),
            endpoint,
            key,
        })
    }

    /// Add the date, version and signature headers for one request.
    fn sign(
        &self,
        builder: RequestBuilder,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
    ) -> Result<RequestBuilder, CosmosError> {
        let date = auth::request_date();
        let authorization =
            auth::authorization(&self.key, verb, resource_type, resource_link, &date)?;

        Ok(builder
            .header("x-ms-date", date)
            .header("x-ms-version", "2018-12-31")
            .header("authorization", authorization))
    }

    fn parse<T: DeserializeOwned>(response: Response) -> Result<T, CosmosError> {
        let status = response.status().as_u16();
        let body = response.text()?;

        if !(200..300).contains(&status) {
            return Err(CosmosError::Request { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl DocumentClient for CosmosClient {
    fn list_databases(&self) -> Result<Vec<DatabaseMeta>, CosmosError> {
        let url = self.endpoint.join("dbs")?;
        let request = self.sign(self.http.get(url), "get", "dbs", "")?;
        let response: DatabaseListResponse = Self::parse(request.send()?)?;
        Ok(response.databases)
    }

    fn list_collections(&self, database: &str) -> Result<Vec<CollectionMeta>, CosmosError> {
        let link = format!("dbs/{}", database);
        let url = self.endpoint.join(&format!("{}/colls", link))?;
        let request = self.sign(self.http.get(url), "get", "colls", &link)?;
        let response: CollectionListResponse = Self::parse(request.send()?)?;
        Ok(response.collections)
    }

    fn query_documents(
        &self,
        database: &str,
        collection: &str,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<JsonValue>, CosmosError> {
        let link = format!("dbs/{}/colls/{}", database, collection);
        let url = self.endpoint.join(&format!("{}/docs", link))?;

        let body = QueryBody {
            query,
            parameters: Vec::new(),
        };

        let request = self
            .sign(self.http.post(url), "post", "docs", &link)?
            .header("x-ms-documentdb-isquery", "True")
            .header("Content-Type", "application/query+json")
            .header(
                "x-ms-documentdb-query-enablecrosspartition",
                if options.enable_cross_partition {
                    "true"
                } else {
                    "false"
                },
            )
            .json(&body);

        let response: QueryResponse = Self::parse(request.send()?)?;
        Ok(response.documents)
    }
}
