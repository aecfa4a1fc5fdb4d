//! Built-in analysis templates, one per scenario.
//!
//! Prompt content is opaque to the engine; the only contract is the
//! `{{CODE}}` placeholder and the fenced-JSON response shape each prompt
//! requests, which the response parser's per-scenario projection expects.

use crate::domain::scenario::AnalysisScenario;

use super::Template;

const API_DISCOVERY_PROMPT: &str = r#"Analyze the following JavaScript code and extract every API endpoint. Respond with JSON.

Requirements:
1. Identify all HTTP requests (fetch, axios, XMLHttpRequest, $.ajax and similar).
2. For each endpoint report the HTTP method, path or full URL, query/body parameters, auth-related headers, and the authentication type (Bearer token, API key, cookie, basic auth).
3. Give the code location (line number and snippet) for each endpoint.
4. Report the API root and version prefix if one exists, and any GraphQL endpoint.

Output format:
```json
{
  "apiRoot": "https://api.example.com/v1",
  "endpoints": [
    {
      "method": "GET",
      "path": "/users",
      "fullUrl": "https://api.example.com/v1/users",
      "params": {"query": ["page", "limit"], "body": null},
      "headers": {"Authorization": "Bearer {token}"},
      "authType": "Bearer Token",
      "location": {"line": 123, "snippet": "axios.get('/users', ...)"}
    }
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const SECRET_SCAN_PROMPT: &str = r#"Scan the following JavaScript code for sensitive information. Respond with JSON.

Look for: API keys (cloud and third-party services), access tokens (JWT, OAuth, session), hardcoded credentials, database connection strings, private keys, internal hostnames and IP addresses, and secrets left in comments.

For every finding report the type, a risk level (high, medium, low), the value (truncate long keys), the code location, a short description, and how to remediate it.

Output format:
```json
{
  "findings": [
    {
      "type": "api-key",
      "value": "sk-abc123...",
      "riskLevel": "high",
      "location": {"line": 45, "snippet": "const API_KEY = 'sk-abc123...';"},
      "description": "OpenAI API key hardcoded in source",
      "remediation": "Move the key to server-side configuration"
    }
  ],
  "summary": {"total": 1, "high": 1, "medium": 0, "low": 0}
}
```

JavaScript code:
---
{{CODE}}
---"#;

const AUTH_ANALYSIS_PROMPT: &str = r#"Analyze the authentication and authorization logic in the following JavaScript code. Respond with JSON.

Cover: the login flow, token generation and validation, session and cookie handling, permission and role checks, route guards, and where each check runs (client or server). Flag weaknesses such as client-only validation, weak token generation, insecure token storage, missing CSRF protection, and describe how each could be bypassed.

Output format:
```json
{
  "authentication": {
    "loginFlow": "description",
    "tokenType": "JWT|Session|Custom",
    "tokenStorage": "localStorage|sessionStorage|cookie",
    "tokenValidation": "client|server|mixed"
  },
  "authorization": {"checkLocations": [], "roleSystem": "description"},
  "vulnerabilities": [
    {
      "type": "client-validation",
      "severity": "high",
      "description": "role check only runs client-side",
      "location": {"line": 89, "snippet": "if (user.role === 'admin') ..."},
      "bypass": "edit the check in DevTools",
      "remediation": "enforce the check server-side"
    }
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const CRYPTO_DETECTION_PROMPT: &str = r#"Identify the cryptographic and signing algorithms used in the following JavaScript code. Respond with JSON.

Cover: symmetric and asymmetric ciphers, hash functions, HMAC/signature schemes, where keys come from (hardcoded, generated, derived), key lengths, IV and salt handling. Flag weaknesses: broken algorithms (MD5, DES), hardcoded keys, predictable IVs or salts, Math.random in security contexts, ECB mode.

Output format:
```json
{
  "algorithms": [
    {
      "type": "symmetric",
      "algorithm": "AES-256-CBC",
      "location": {"line": 56, "snippet": "crypto.createCipheriv('aes-256-cbc', key, iv)"},
      "keySource": "hardcoded|generated|derived",
      "security": "secure|weak|vulnerable"
    }
  ],
  "weaknesses": [
    {"type": "weak-algorithm", "description": "MD5 in use", "severity": "medium", "location": {"line": 123}}
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const VULNERABILITY_SCAN_PROMPT: &str = r#"Detect common vulnerability patterns in the following JavaScript code. Respond with JSON.

Check for: XSS (innerHTML, dangerouslySetInnerHTML, document.write), code injection (eval, Function constructor, string setTimeout), prototype pollution, missing CSRF tokens, insecure randomness, path traversal, open redirects, and postMessage misuse.

For each vulnerability report the type, severity (critical, high, medium, low), a title, a description, the code location, a proof-of-concept exploitation note, the CWE id, a CVSS estimate when applicable, and remediation advice.

Output format:
```json
{
  "vulnerabilities": [
    {
      "type": "xss",
      "severity": "high",
      "title": "DOM-based XSS via innerHTML",
      "description": "user input flows into innerHTML unfiltered",
      "location": {"line": 234, "snippet": "element.innerHTML = userInput;"},
      "exploitation": "<img src=x onerror=alert(1)>",
      "cwe": "CWE-79",
      "cvss": 7.5,
      "remediation": "use textContent or sanitize with DOMPurify"
    }
  ],
  "summary": {"total": 1, "critical": 0, "high": 1, "medium": 0, "low": 0}
}
```

JavaScript code:
---
{{CODE}}
---"#;

const BUSINESS_LOGIC_PROMPT: &str = r#"Analyze the business logic implemented in the following JavaScript code. Respond with JSON.

Identify key flows (payment, ordering, discount and coupon calculation, inventory, balance operations, state transitions) and business-logic weaknesses: price manipulation, negative quantities, race conditions, state bypasses, duplicate submission. Note which validations run client-side only and should be enforced server-side, and suggest test steps.

Output format:
```json
{
  "businessFlows": [
    {"name": "checkout", "steps": [], "clientValidations": [], "serverValidations": []}
  ],
  "vulnerabilities": [
    {
      "type": "price-manipulation",
      "severity": "critical",
      "description": "total price computed client-side",
      "location": {"line": 456},
      "testSteps": ["intercept the request", "modify the price field", "replay"]
    }
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const HIDDEN_FEATURES_PROMPT: &str = r#"Discover hidden functionality and undocumented interfaces in the following JavaScript code. Respond with JSON.

Look for: routes not linked from the UI, debug and test endpoints, admin functionality, feature flags and conditionally enabled features, commented-out functionality, and special paths such as /admin, /debug, /test. For each, describe its access control and how it could be reached.

Output format:
```json
{
  "hiddenRoutes": [
    {
      "path": "/admin/users",
      "description": "user management backend",
      "accessControl": "only checks an isAdmin flag in localStorage",
      "location": {"line": 789},
      "securityImpact": "high"
    }
  ],
  "debugEndpoints": [
    {"endpoint": "/api/debug/dump", "description": "debug export", "location": {"line": 123}}
  ],
  "featureFlags": [
    {"name": "enableBetaFeatures", "checkMethod": "localStorage.getItem('beta')"}
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const WEBSOCKET_ANALYSIS_PROMPT: &str = r#"Analyze the WebSocket communication in the following JavaScript code. Respond with JSON.

Cover: connection URLs and protocols, connection and reconnection logic, message types and serialization format, whether the transport is encrypted (wss://), how the connection authenticates, message validation, and injection risks in message handlers.

Output format:
```json
{
  "connections": [
    {
      "url": "wss://example.com/socket",
      "protocol": "custom JSON protocol",
      "authentication": "token query parameter",
      "encrypted": true,
      "location": {"line": 42, "snippet": "new WebSocket(url)"}
    }
  ],
  "messages": [
    {"direction": "send", "type": "subscribe", "format": "JSON"}
  ],
  "summary": "one WebSocket connection with token auth",
  "recommendations": ["validate inbound message schemas"]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const GRAPHQL_ANALYSIS_PROMPT: &str = r#"Analyze the GraphQL operations in the following JavaScript code. Respond with JSON.

Cover: the GraphQL endpoint and client configuration, every query and mutation (name, arguments, requested fields, nesting depth), fragments and directives, and security concerns: deep-nesting and batching attack exposure, sensitive fields, whether introspection appears enabled, and how requests authenticate.

Output format:
```json
{
  "endpoint": "/graphql",
  "queries": [
    {"name": "getUser", "arguments": ["id"], "fields": ["email", "role"], "depth": 2}
  ],
  "mutations": [
    {"name": "updateUser", "arguments": ["id", "input"]}
  ],
  "security": {
    "introspectionEnabled": false,
    "sensitiveFields": ["email"],
    "concerns": ["unbounded query depth"]
  }
}
```

JavaScript code:
---
{{CODE}}
---"#;

const ANTI_DEBUG_ANALYSIS_PROMPT: &str = r#"Analyze the anti-debugging and protection techniques in the following JavaScript code. Respond with JSON.

Look for: debugger statements, console detection, timing checks, DevTools detection (window size, toString probes), Function.prototype.toString checks, obfuscation and dynamic code generation, environment and VM detection, domain locks, integrity checks. For each technique note where it is and how it could be bypassed or hooked.

Output format:
```json
{
  "techniques": [
    {
      "type": "debugger-loop",
      "description": "debugger statement in a timer",
      "location": {"line": 10, "snippet": "setInterval(() => { debugger; }, 100)"},
      "bypass": "disable breakpoints or hook setInterval"
    }
  ],
  "protections": [
    {"type": "domain-lock", "description": "whitelist check on location.hostname"}
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const ROUTE_ANALYSIS_PROMPT: &str = r#"Analyze the front-end routing configuration in the following JavaScript code. Respond with JSON.

Identify the routing framework (React Router, Vue Router, Angular Router), every route definition (path, parameters, component, guards, lazy loading), the permission model behind guards, and routes that are not reachable from navigation: admin routes, debug routes, development-only routes.

Output format:
```json
{
  "framework": "react-router",
  "routes": [
    {"path": "/admin", "component": "AdminPanel", "guard": "requiresAdmin", "hidden": true}
  ],
  "guards": [
    {"name": "requiresAdmin", "check": "client-side role flag", "bypassable": true}
  ],
  "hiddenRoutes": [
    {"path": "/internal/metrics", "description": "not linked from navigation"}
  ]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const DATA_FLOW_ANALYSIS_PROMPT: &str = r#"Trace the flow of sensitive data through the following JavaScript code. Respond with JSON.

Identify sensitive sources (form input, URL parameters, localStorage, cookies, API responses), follow each value through transformation and storage to its sinks (network requests, DOM, logs, third parties), and flag unsafe handling: plaintext storage, unencrypted transmission, logging, exposure to third-party scripts, XSS-prone sinks.

Output format:
```json
{
  "sensitiveData": [
    {
      "type": "password",
      "source": "login form",
      "path": ["form input", "validatePassword()", "POST /api/login"],
      "sinks": ["network"],
      "issues": ["also written to console.log"],
      "location": {"line": 77}
    }
  ],
  "recommendations": ["strip credential logging"]
}
```

JavaScript code:
---
{{CODE}}
---"#;

const CUSTOM_PROMPT: &str = r#"Perform a comprehensive security analysis of the following JavaScript code. Respond with JSON.

Cover all of: API endpoints, hardcoded secrets, authentication and authorization logic, cryptography, common vulnerability patterns, business logic weaknesses, and hidden functionality. Finish with an overall risk assessment and prioritized recommendations.

Output format:
```json
{
  "summary": {"riskLevel": "high|medium|low", "totalFindings": 0, "critical": 0, "high": 0, "medium": 0, "low": 0},
  "apiEndpoints": [],
  "secrets": [],
  "authIssues": [],
  "cryptoIssues": [],
  "vulnerabilities": [],
  "businessLogicIssues": [],
  "hiddenFeatures": [],
  "recommendations": []
}
```

JavaScript code:
---
{{CODE}}
---"#;

/// The seed catalog: one template per scenario, in catalog order.
pub(super) fn builtin_templates() -> Vec<Template> {
    vec![
        Template::new(
            AnalysisScenario::ApiDiscovery,
            "API endpoint discovery",
            "Extract API endpoints, methods, parameters, and auth headers",
            API_DISCOVERY_PROMPT,
        ),
        Template::new(
            AnalysisScenario::SecretScan,
            "Secret scan",
            "Find hardcoded keys, tokens, credentials, and connection strings",
            SECRET_SCAN_PROMPT,
        ),
        Template::new(
            AnalysisScenario::AuthAnalysis,
            "Authentication logic analysis",
            "Map auth flows and find bypassable checks",
            AUTH_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::CryptoDetection,
            "Cryptography detection",
            "Identify crypto algorithms, key handling, and weak primitives",
            CRYPTO_DETECTION_PROMPT,
        ),
        Template::new(
            AnalysisScenario::VulnerabilityScan,
            "Vulnerability pattern scan",
            "Detect XSS, injection, prototype pollution, and related patterns",
            VULNERABILITY_SCAN_PROMPT,
        ),
        Template::new(
            AnalysisScenario::BusinessLogic,
            "Business logic analysis",
            "Find client-side business logic that can be tampered with",
            BUSINESS_LOGIC_PROMPT,
        ),
        Template::new(
            AnalysisScenario::HiddenFeatures,
            "Hidden feature discovery",
            "Surface hidden routes, debug endpoints, and feature flags",
            HIDDEN_FEATURES_PROMPT,
        ),
        Template::new(
            AnalysisScenario::WebsocketAnalysis,
            "WebSocket communication analysis",
            "Analyze WebSocket connections, protocols, and message security",
            WEBSOCKET_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::GraphqlAnalysis,
            "GraphQL operation analysis",
            "Extract GraphQL operations and assess schema exposure",
            GRAPHQL_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::AntiDebugAnalysis,
            "Anti-debugging analysis",
            "Identify anti-debugging and protection techniques",
            ANTI_DEBUG_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::RouteAnalysis,
            "Front-end route analysis",
            "Map SPA routes, guards, and unlisted paths",
            ROUTE_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::DataFlowAnalysis,
            "Sensitive data flow tracing",
            "Trace sensitive data from sources to sinks",
            DATA_FLOW_ANALYSIS_PROMPT,
        ),
        Template::new(
            AnalysisScenario::Custom,
            "Comprehensive security analysis",
            "Full-surface security analysis in one pass",
            CUSTOM_PROMPT,
        ),
    ]
}
